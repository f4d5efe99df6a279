// Build script for the native client library linkage
//
// The voice engine ships as a prebuilt shared library (libts3client.so) per ABI.
// Point TS3_SDK_LIB_DIR at the directory holding the library for the ABI being
// built, e.g.:
//   TS3_SDK_LIB_DIR=sdk/lib/android/arm64-v8a cargo ndk -t arm64-v8a build

fn main() {
    println!("cargo:rerun-if-env-changed=TS3_SDK_LIB_DIR");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("android") {
        // The engine is C++ and needs the shared STL on every ABI.
        println!("cargo:rustc-link-lib=c++_shared");

        if let Ok(dir) = std::env::var("TS3_SDK_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir);
        }
        println!("cargo:rustc-link-lib=dylib=ts3client");
    }
}
