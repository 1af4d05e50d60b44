fn main() {
    linker_be_nice();

    // Host builds (unit and integration tests) link with the normal toolchain
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
    // make sure linkall.x is the last linker script (otherwise might cause problems with flip-link)
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Invoked again by the linker with `<kind> <symbol>` when linking fails
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();
    if let Some(kind) = args.get(1) {
        let what = args.get(2).map(String::as_str);

        match kind.as_str() {
            "undefined-symbol" => match what {
                Some("_defmt_timestamp") => {
                    eprintln!();
                    eprintln!("💡 `defmt` not found - make sure `defmt.x` is added as a linker script and you have included `use defmt_rtt as _;`");
                    eprintln!();
                }
                Some("_stack_start") => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                _ => (),
            },
            // we don't have anything helpful for "missing-lib" yet
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }
}
