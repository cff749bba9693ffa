//! End-to-end generation through the library API.

mod common;

use common::{calculator, doc, options};
use skelgen::assertion::{AssertionKind, TemplateKind};
use skelgen::template::{TemplateRenderer, TemplateSet, TemplateVars};
use skelgen::{
    generate, ClassMetadata, ErrorType, MetadataManifest, SkelError, SourceMethod, TestGenerator,
};

fn method_names(class: &ClassMetadata) -> Vec<String> {
    TestGenerator::new(options())
        .assemble(class)
        .unwrap()
        .methods
        .into_iter()
        .map(|method| method.name)
        .collect()
}

#[test]
fn generic_assertion_compares_call_with_expected() {
    let class = TestGenerator::new(options()).assemble(&calculator()).unwrap();
    let add = &class.methods[0];
    assert_eq!(add.name, "Add");
    assert_eq!(add.orig_method_name, "add");

    let assertion = add.assertion.as_ref().unwrap();
    assert_eq!(assertion.kind, AssertionKind::Equals);
    assert_eq!(assertion.template, TemplateKind::Generic);
    assert_eq!(assertion.arguments, "2, 3");
    assert_eq!(assertion.expected, "5");
    assert!(add.rendered_body.contains("public function testAdd()"));
    assert!(add
        .rendered_body
        .contains("\t\t$this->assertEquals(\n\t\t\t5,\n\t\t\t$this->object->add(2, 3)\n\t\t);"));
}

#[test]
fn repeated_method_gets_numbered_name() {
    let class = TestGenerator::new(options()).assemble(&calculator()).unwrap();
    let second = &class.methods[1];
    assert_eq!(second.name, "Add2");
    assert!(second.rendered_body.contains("public function testAdd2()"));
    assert!(second.rendered_body.contains("$this->object->add(0, 0)"));
}

#[test]
fn false_expectation_flips_to_negated_boolean() {
    let class = TestGenerator::new(options()).assemble(&calculator()).unwrap();
    let check = &class.methods[2];
    assert_eq!(check.name, "IsEmpty");
    let assertion = check.assertion.as_ref().unwrap();
    assert_eq!(assertion.kind, AssertionKind::NotEmpty);
    assert_eq!(assertion.template, TemplateKind::Boolean);
    assert_eq!(assertion.expected, "");
    assert!(check
        .rendered_body
        .contains("$this->assertNotEmpty(\n\t\t\t$this->object->isEmpty(value)\n\t\t);"));
}

#[test]
fn untagged_method_becomes_incomplete_stub() {
    let class = TestGenerator::new(options()).assemble(&calculator()).unwrap();
    let stub = class.methods.last().unwrap();
    assert_eq!(stub.name, "Reset");
    assert!(stub.is_incomplete());
    assert!(stub.tag.is_none());
    assert!(stub.rendered_body.contains("public function testReset()"));
    assert!(stub.rendered_body.contains("markTestIncomplete"));
}

#[test]
fn unknown_operator_aborts_generation() {
    let class = calculator().with_method(SourceMethod::new(
        "pattern",
        doc(&["@assert ('abc') regexmatch '/a/'"]),
    ));
    let err = generate(&class, "\\Acme\\Calculator", options()).unwrap_err();
    match &err {
        SkelError::UnsupportedOperator { operator, tag, .. } => {
            assert_eq!(operator, "regexmatch");
            assert!(tag.contains("regexmatch"));
        }
        other => panic!("expected an unsupported operator error, got {other:?}"),
    }
    assert!(err.to_string().contains("regexmatch"));
}

#[test]
fn malformed_tag_aborts_generation() {
    let class = calculator().with_method(SourceMethod::new("broken", doc(&["@assert (1, 2"])));
    let err = TestGenerator::new(options()).assemble(&class).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Parse);
}

#[test]
fn ineligible_methods_are_skipped() {
    let names = method_names(&calculator());
    assert_eq!(names, vec!["Add", "Add2", "IsEmpty", "Reset"]);
}

#[test]
fn methods_keep_declaration_order_with_stubs_last() {
    let class = ClassMetadata::new("Sequence")
        .with_method(SourceMethod::new("first", ""))
        .with_method(SourceMethod::new("second", doc(&["@assert (1) == 1"])))
        .with_method(SourceMethod::new("third", doc(&["Nothing here."])))
        .with_method(SourceMethod::new("fourth", doc(&["@assert (2) > 1"])));
    assert_eq!(method_names(&class), vec!["Second", "Fourth", "First", "Third"]);
}

#[test]
fn naming_does_not_leak_between_runs() {
    let generator = TestGenerator::new(options());
    let first = generator.generate_class(&calculator()).unwrap();
    let second = generator.generate_class(&calculator()).unwrap();
    assert_eq!(first, second);
    assert!(!second.contains("testAdd3"));
}

#[test]
fn rendered_class_wraps_methods() {
    let source = generate(&calculator(), "Acme\\Calculator", options()).unwrap();
    assert!(source.starts_with("<?php\nnamespace Acme;\n\n/**\n * Generated by skelgen 1.0.0 on 2024-03-09 at 14:05:30.\n */"));
    assert!(source.contains("class CalculatorTest extends \\PHPUnit_Framework_TestCase"));
    assert!(source.contains("\t\t$this->object = new Calculator(10);"));

    let add = source.find("testAdd()").unwrap();
    let add2 = source.find("testAdd2()").unwrap();
    let is_empty = source.find("testIsEmpty()").unwrap();
    let reset = source.find("testReset()").unwrap();
    assert!(add < add2 && add2 < is_empty && is_empty < reset);
    assert!(source.ends_with("\t}\n}\n"));
}

#[test]
fn global_class_has_no_namespace() {
    let class = ClassMetadata::new("Counter")
        .with_method(SourceMethod::new("next", doc(&["@assert () == 1"])));
    let source = generate(&class, "Counter", options()).unwrap();
    assert!(source.starts_with("<?php\n/**"));
    assert!(source.contains("new Counter();"));
    assert!(source.contains("$this->object->next()\n"));
}

#[test]
fn static_methods_use_static_templates() {
    let class = ClassMetadata::new("\\Acme\\Math")
        .with_method(SourceMethod::new("square", doc(&["@assert (3) == 9"])).with_static(true))
        .with_method(
            SourceMethod::new("cachePath", doc(&["@assert ('x') file-exists FALSE"]))
                .with_static(true),
        );
    let class = TestGenerator::new(options()).assemble(&class).unwrap();

    let square = &class.methods[0];
    assert_eq!(
        square.assertion.as_ref().unwrap().template,
        TemplateKind::GenericStatic
    );
    assert!(square.rendered_body.contains("\t\t\t9,\n\t\t\tMath::square(3)"));

    let cache_path = &class.methods[1];
    let assertion = cache_path.assertion.as_ref().unwrap();
    assert_eq!(assertion.kind, AssertionKind::FileNotExists);
    assert_eq!(assertion.template, TemplateKind::BooleanStatic);
    assert!(cache_path
        .rendered_body
        .contains("$this->assertFileNotExists(\n\t\t\tMath::cachePath('x')"));
}

#[test]
fn throws_uses_exception_template() {
    let class = ClassMetadata::new("Divider").with_method(SourceMethod::new(
        "divide",
        doc(&["@assert (1, 0) throws \\DivisionByZeroError"]),
    ));
    let class = TestGenerator::new(options()).assemble(&class).unwrap();
    let divide = &class.methods[0];
    assert_eq!(
        divide.assertion.as_ref().unwrap().template,
        TemplateKind::Exception
    );
    assert!(divide
        .rendered_body
        .contains("@expectedException \\DivisionByZeroError"));
    assert!(divide.rendered_body.contains("\t\t$this->object->divide(1, 0);"));
}

#[test]
fn preface_lines_become_comments() {
    let class = ClassMetadata::new("Stack").with_method(SourceMethod::new(
        "push",
        doc(&["@assert Starts from an empty stack.", "(1) == 1"]),
    ));
    let class = TestGenerator::new(options()).assemble(&class).unwrap();
    assert!(class.methods[0]
        .rendered_body
        .contains("\t\t// Starts from an empty stack.\n\n\t\t$this->assertEquals("));
}

#[test]
fn noted_tags_still_generate_methods() {
    let class = ClassMetadata::new("Stack").with_method(SourceMethod::new(
        "pop",
        doc(&["@assert-empty (1) == 1", "@assert (2) == 2"]),
    ));
    let class = TestGenerator::new(options()).assemble(&class).unwrap();
    assert_eq!(class.methods.len(), 2);
    assert_eq!(class.methods[0].tag.as_ref().unwrap().note.as_deref(), Some("empty"));
    assert_eq!(class.methods[1].name, "Pop2");
}

#[test]
fn unknown_class_is_metadata_unavailable() {
    let manifest = MetadataManifest::new(vec![calculator()]);
    let err = generate(&manifest, "\\Acme\\Missing", options()).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::MetadataUnavailable);
}

struct Upper(TemplateSet);

impl TemplateRenderer for Upper {
    fn render(&self, template_id: &str, vars: &TemplateVars) -> Result<String, SkelError> {
        Ok(self.0.render(template_id, vars)?.to_uppercase())
    }
}

#[test]
fn custom_renderer_is_used_for_every_template() {
    let generator = TestGenerator::with_renderer(Upper(TemplateSet::builtin()), options());
    let source = generator.generate_class(&calculator()).unwrap();
    assert!(source.contains("CLASS CALCULATORTEST"));
    assert!(source.contains("PUBLIC FUNCTION TESTADD2()"));
}

#[test]
fn numbered_names_skip_existing_method_names() {
    let class = ClassMetadata::new("Adder")
        .with_method(SourceMethod::new("add", doc(&["@assert (1) == 1", "@assert (2) == 2"])))
        .with_method(SourceMethod::new("add2", doc(&["@assert (3) == 3"])))
        .with_method(SourceMethod::new("add3", ""));
    let names = method_names(&class);
    assert_eq!(names, vec!["Add", "Add2", "Add22", "Add3"]);

    let source = generate(&class, "Adder", options()).unwrap();
    assert_eq!(source.matches("public function testAdd2()").count(), 1);
}

#[test]
fn constructor_arguments_keep_nested_calls() {
    let class = calculator().with_doc_comment(doc(&["@assert (new Foo(), 2)"]));
    let source = generate(&class, "\\Acme\\Calculator", options()).unwrap();
    assert!(source.contains("\t\t$this->object = new Calculator(new Foo(), 2);"));
}
