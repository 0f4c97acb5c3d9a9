const LIB_DIR_ENV: &str = "MGOS_HCSR04_LIB_DIR";

fn main() {
    println!("cargo:rerun-if-env-changed={LIB_DIR_ENV}");
    // Only the device build links against ESP-IDF and the native driver
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("espidf") {
        return;
    }
    embuild::espidf::sysenv::output();

    // Without it the firmware must provide the symbols, e.g. as an IDF component
    if let Ok(lib_dir) = std::env::var(LIB_DIR_ENV) {
        println!("cargo:rustc-link-search=native={lib_dir}");
        println!("cargo:rustc-link-lib=static=mgos_hcsr04");
    }
}
