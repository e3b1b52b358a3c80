//! `qtpack options` command
//!
//! Lists the options that exist on the target platform with their
//! defaults and accepted values.

use anyhow::Result;

use crate::cli::PlatformArgs;
use qtpack::core::options::DECLARATIONS;

pub fn execute(args: PlatformArgs) -> Result<()> {
    let platform = super::platform(&args)?;

    println!("Options for {}:", platform);
    for decl in DECLARATIONS.iter().filter(|d| d.available_on(&platform.os)) {
        println!(
            "  {:<18} default: {:<8} values: {}",
            decl.name,
            decl.default,
            decl.allowed_values().join(", ")
        );
    }

    Ok(())
}
