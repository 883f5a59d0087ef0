fn main() {
    // Stamped into `ridgeline --version` output.
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=RIDGELINE_BUILD_DATE={}", build_date);
}
