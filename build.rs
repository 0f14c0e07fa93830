fn main() {
    println!("cargo:rerun-if-env-changed=AIRSENTRY_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_SERVER_HOST");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_SERVER_PORT");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_SERVER_PATH");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_USE_TLS");
    println!("cargo:rerun-if-env-changed=AIRSENTRY_DEVICE_ID");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
