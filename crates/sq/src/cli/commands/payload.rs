//! Implementation of `sq payload`.

use std::process::ExitCode;

use sq_similarity::{PayloadBytes, encode_float, payload_weight};

use crate::cli::args::PayloadCommand;

/// Decodes hex payloads into weights, or encodes floats with `--encode`.
pub fn run(cmd: &PayloadCommand) -> ExitCode {
    for value in &cmd.values {
        let line = if cmd.encode {
            encode(value)
        } else {
            decode(value)
        };
        match line {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Formats `value` as a payload: `<float>\t<hex>`.
fn encode(value: &str) -> Result<String, String> {
    let weight = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid payload weight [{value}]"))?;
    Ok(format!("{weight}\t{}", to_hex(&encode_float(weight))))
}

/// Formats the weight a hex payload carries: `<hex>\t<weight>`.
fn decode(value: &str) -> Result<String, String> {
    let bytes = from_hex(value).ok_or_else(|| format!("invalid hex payload [{value}]"))?;
    let weight = payload_weight(Some(PayloadBytes::new(&bytes)));
    Ok(format!("{}\t{weight}", to_hex(&bytes)))
}

/// Lower-case hex digits.
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parses hex digits, with an optional `0x` prefix.
fn from_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.len() % 2 != 0 || !digits.is_ascii() {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}
