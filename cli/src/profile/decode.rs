use clap::Args;
use kensa_profile::DecodedValue;

use crate::args::CommonArgs;
use crate::error::Result;
use crate::output::render;

#[derive(Args)]
pub(crate) struct Config {
    #[command(flatten)]
    common: CommonArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = config.common.read()?;
    let value = kensa_profile::decode_and_verify(&input)?;

    let out = render(&value, config.common.output, config.common.compact, |value| {
        let mut out = String::new();
        tree(&mut out, 0, None, value);
        Ok(out)
    })?;
    print!("{}", out);
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Indented outline of a value, one scalar per line.
fn tree(out: &mut String, depth: usize, key: Option<&str>, value: &DecodedValue) {
    let indent = "    ".repeat(depth);
    let label = key.map(|key| format!("{}: ", key)).unwrap_or_default();
    match value {
        DecodedValue::Dictionary(entries) => {
            out.push_str(&format!("{}{}<dictionary>\n", indent, label));
            for (key, value) in entries {
                tree(out, depth + 1, Some(key), value);
            }
        }
        DecodedValue::Array(values) => {
            out.push_str(&format!("{}{}<array>\n", indent, label));
            for value in values {
                tree(out, depth + 1, None, value);
            }
        }
        scalar => out.push_str(&format!("{}{}{}\n", indent, label, scalar)),
    }
}
