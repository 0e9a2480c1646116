use clap::Args;
use kensa_cms::{SignedPayload, SignerOutcome, SignerStatus};
use kensa_cms::signer_info::SignerIdentifier;
use serde::Serialize;

use crate::args::CommonArgs;
use crate::error::Result;
use crate::output::{field, render};

#[derive(Args)]
pub(crate) struct Config {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct Summary {
    content_type: String,
    content_length: usize,
    signers: Vec<SignerOutcome>,
    certificates: Vec<CertificateSummary>,
}

#[derive(Serialize)]
struct CertificateSummary {
    subject: String,
    issuer: String,
    serial: String,
    sha256: String,
}

impl From<SignedPayload> for Summary {
    fn from(payload: SignedPayload) -> Self {
        Summary {
            content_type: payload.content_type.to_string(),
            content_length: payload.content.len(),
            signers: payload.signers,
            certificates: payload
                .certificates
                .into_iter()
                .map(|record| CertificateSummary {
                    subject: record.subject.to_string(),
                    issuer: record.issuer.to_string(),
                    serial: record.serial.to_string(),
                    sha256: record.fingerprints.sha256,
                })
                .collect(),
        }
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = config.common.read()?;
    let summary = Summary::from(kensa_cms::verify(&input)?);

    let out = render(&summary, config.common.output, config.common.compact, text)?;
    print!("{}", out);
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn text(summary: &Summary) -> Result<String> {
    let mut out = String::new();
    field(&mut out, 0, "Content Type", &summary.content_type)?;
    field(&mut out, 0, "Content Length", summary.content_length)?;
    for (i, signer) in summary.signers.iter().enumerate() {
        field(&mut out, 0, "Signer", i + 1)?;
        match &signer.signer {
            SignerIdentifier::IssuerAndSerialNumber(id) => {
                field(&mut out, 1, "Issuer", &id.issuer)?;
                field(&mut out, 1, "Serial Number", &id.serial_number)?;
            }
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                field(&mut out, 1, "Subject Key Identifier", ski.hex())?;
            }
        }
        field(&mut out, 1, "Digest Algorithm", signer.digest_algorithm.algorithm())?;
        field(&mut out, 1, "Signature Algorithm", signer.signature_algorithm.algorithm())?;
        field(&mut out, 1, "Signed Attributes", signer.signed_attributes)?;
        if let Some(time) = signer.signing_time {
            field(&mut out, 1, "Signing Time", time.format("%b %d %H:%M:%S %Y GMT"))?;
        }
        let status = match &signer.status {
            SignerStatus::Verified => "verified".to_string(),
            SignerStatus::Failed(reason) => format!("failed ({:?})", reason),
        };
        field(&mut out, 1, "Status", status)?;
    }
    for (i, cert) in summary.certificates.iter().enumerate() {
        field(&mut out, 0, "Certificate", i + 1)?;
        field(&mut out, 1, "Subject", &cert.subject)?;
        field(&mut out, 1, "Issuer", &cert.issuer)?;
        field(&mut out, 1, "Serial Number", &cert.serial)?;
        field(&mut out, 1, "SHA-256 Fingerprint", &cert.sha256)?;
    }
    Ok(out)
}
