use std::env;

fn main() {
    // Publish event name (optional, defaults to "gps")
    if let Ok(name) = env::var("TRACKER_EVENT_NAME") {
        println!("cargo:rustc-env=TRACKER_EVENT_NAME={}", name);
        println!(
            "cargo:warning=Using TRACKER_EVENT_NAME from environment: {}",
            name
        );
    } else {
        println!("cargo:rustc-env=TRACKER_EVENT_NAME=gps");
    }

    println!("cargo:rerun-if-env-changed=TRACKER_EVENT_NAME");
}
