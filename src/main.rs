fn main() {
    robocheck::cli::run();
}
