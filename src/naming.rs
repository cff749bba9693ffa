//! Generated-method naming.

use std::collections::{HashMap, HashSet};

/// Hands out unique generated-method names for one generation run.
///
/// The first use of a name is returned bare; later uses get the running count as a
/// suffix (`Add`, `Add2`, `Add3`). A candidate already handed out (say `Add2` from a
/// source method named `add2`) is skipped by counting on. Create one namer per run and
/// drop it afterwards.
#[derive(Debug, Default)]
pub struct MethodNamer {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl MethodNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next name for `source_name`.
    pub fn next_name(&mut self, source_name: &str) -> String {
        let base = capitalize(source_name);
        let count = self.counts.entry(base.clone()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count > 1 {
                format!("{base}{count}")
            } else {
                base.clone()
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Uppercases the first character if it is an ASCII letter; the rest is untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_are_numbered_from_two() {
        let mut namer = MethodNamer::new();
        let names: Vec<_> = (0..4).map(|_| namer.next_name("add")).collect();
        assert_eq!(names, vec!["Add", "Add2", "Add3", "Add4"]);
    }

    #[test]
    fn test_counts_are_per_name() {
        let mut namer = MethodNamer::new();
        assert_eq!(namer.next_name("add"), "Add");
        assert_eq!(namer.next_name("reset"), "Reset");
        assert_eq!(namer.next_name("add"), "Add2");
    }

    #[test]
    fn test_counter_is_keyed_by_capitalized_name() {
        let mut namer = MethodNamer::new();
        assert_eq!(namer.next_name("add"), "Add");
        assert_eq!(namer.next_name("Add"), "Add2");
    }

    #[test]
    fn test_suffix_skips_names_already_issued() {
        let mut namer = MethodNamer::new();
        assert_eq!(namer.next_name("add"), "Add");
        assert_eq!(namer.next_name("add"), "Add2");
        assert_eq!(namer.next_name("add2"), "Add22");
        assert_eq!(namer.next_name("add"), "Add3");
    }

    #[test]
    fn test_suffix_taken_by_earlier_bare_name() {
        let mut namer = MethodNamer::new();
        assert_eq!(namer.next_name("add2"), "Add2");
        assert_eq!(namer.next_name("add"), "Add");
        assert_eq!(namer.next_name("add"), "Add3");
    }

    #[test]
    fn test_fresh_namer_starts_over() {
        let mut first = MethodNamer::new();
        first.next_name("add");
        let mut second = MethodNamer::new();
        assert_eq!(second.next_name("add"), "Add");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("getValue"), "GetValue");
        assert_eq!(capitalize("_private"), "_private");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "élan");
    }
}
