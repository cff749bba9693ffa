fn main() {
    skelgen::cli::run();
}
