use clap::Args;
use kensa_x509::CertificateRecord;

use crate::args::CommonArgs;
use crate::error::Result;
use crate::output::{field, render};

#[derive(Args)]
pub(crate) struct Config {
    #[command(flatten)]
    common: CommonArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = config.common.read()?;
    let records = kensa_pkcs12::decode_certificates(&input)?;
    tracing::info!(certificates = records.len(), "decoded PKCS#12 container");

    let out = render(&records, config.common.output, config.common.compact, |records| {
        text(records)
    })?;
    print!("{}", out);
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn text(records: &[CertificateRecord]) -> Result<String> {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("No certificates\n");
    }
    for (i, record) in records.iter().enumerate() {
        field(&mut out, 0, "Certificate", i + 1)?;
        field(&mut out, 1, "Subject", &record.subject)?;
        field(&mut out, 1, "Issuer", &record.issuer)?;
        field(&mut out, 1, "Serial Number", &record.serial_hex)?;
        field(
            &mut out,
            1,
            "Not Before",
            record.validity.not_before.format("%b %d %H:%M:%S %Y GMT"),
        )?;
        field(
            &mut out,
            1,
            "Not After",
            record.validity.not_after.format("%b %d %H:%M:%S %Y GMT"),
        )?;
        field(&mut out, 1, "SHA-256 Fingerprint", &record.fingerprints.sha256)?;
        if let Some(name) = &record.friendly_name {
            field(&mut out, 1, "Friendly Name", name)?;
        }
        if let Some(id) = &record.local_key_id {
            field(&mut out, 1, "Local Key ID", id.hex())?;
        }
    }
    Ok(out)
}
