fn main() {
    textmath::cli::run();
}
