fn main() {
    // The ESP-IDF build environment only exists for device builds; host
    // test builds (--no-default-features) must not require it.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
