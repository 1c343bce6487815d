use crate::infra::{draft_from_fields, parse_kind, read_fields};
use clap::Args;
use imwera_enquiry::config::AppConfig;
use imwera_enquiry::enquiry::{
    template_parameters, validate, DeliverySettings, EmailJsClient, EnquiryKind, SubmissionClient,
};
use imwera_enquiry::error::AppError;
use imwera_enquiry::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Enquiry kind: sourcing, contact, or partner
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: EnquiryKind,
    /// JSON file holding the form field values
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SendArgs {
    /// Enquiry kind: sourcing, contact, or partner
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: EnquiryKind,
    /// JSON file holding the form field values
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the template parameters instead of calling EmailJS
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let draft = draft_from_fields(args.kind, read_fields(&args.input)?)?;

    match validate(&draft, draft.schema()) {
        Ok(()) => {
            println!("{} enquiry is complete", args.kind.label());
            Ok(())
        }
        Err(errors) => {
            println!("{} enquiry has problems:", args.kind.label());
            for violation in errors.violations() {
                println!("  - {violation}");
            }
            Err(AppError::Input(format!(
                "{} field(s) need attention",
                errors.violations().len()
            )))
        }
    }
}

pub(crate) async fn run_send(args: SendArgs) -> Result<(), AppError> {
    let SendArgs {
        kind,
        input,
        dry_run,
    } = args;

    let draft = draft_from_fields(kind, read_fields(&input)?)?;
    validate(&draft, draft.schema()).map_err(|errors| AppError::Input(errors.to_string()))?;

    if dry_run {
        let parameters = template_parameters(&draft);
        println!("{}", serde_json::to_string_pretty(&parameters)?);
        return Ok(());
    }

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mailer = EmailJsClient::new(&config.email)?;
    let client = SubmissionClient::new(DeliverySettings::from(&config.email), Arc::new(mailer));
    if !client.is_configured() {
        warn!("EMAILJS_PUBLIC_KEY is not set; the send will be refused");
    }

    client.send(&draft).await?;
    println!("{} delivered", kind.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Temporary JSON input, removed when dropped.
    struct InputFile(PathBuf);

    impl InputFile {
        fn path(&self) -> PathBuf {
            self.0.clone()
        }
    }

    impl Drop for InputFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn input_file(name: &str, body: &str) -> InputFile {
        let path = std::env::temp_dir().join(format!("imwera-{}-{name}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("create input");
        file.write_all(body.as_bytes()).expect("write input");
        InputFile(path)
    }

    #[test]
    fn validate_accepts_complete_contact_enquiry() {
        let input = input_file(
            "contact-ok",
            r#"{"name":"Sam Trader","email":"sam@beans.co","country":"UK","message":"Hello"}"#,
        );
        run_validate(ValidateArgs {
            kind: EnquiryKind::GeneralContact,
            input: input.path(),
        })
        .expect("valid enquiry");
    }

    #[test]
    fn validate_reports_missing_fields() {
        let input = input_file(
            "sourcing-missing",
            r#"{"name":"Jane Roaster","company":"RoastCo","country":"USA","origins":[]}"#,
        );
        let err = run_validate(ValidateArgs {
            kind: EnquiryKind::Sourcing,
            input: input.path(),
        })
        .expect_err("incomplete");
        assert_eq!(err.to_string(), "invalid input: 2 field(s) need attention");
    }

    #[tokio::test]
    async fn dry_run_never_needs_credentials() {
        let input = input_file(
            "partner-dry-run",
            r#"{"name":"Amina","organization":"Kiambu Coop","role":"Chair","email":"amina@kiambu.coop","country":"Kenya","description":"Washed SL28"}"#,
        );
        run_send(SendArgs {
            kind: EnquiryKind::PartnerIntroduction,
            input: input.path(),
            dry_run: true,
        })
        .await
        .expect("dry run");
    }

    #[tokio::test]
    async fn send_refuses_invalid_input_before_loading_config() {
        let input = input_file("contact-bad-email", r#"{"name":"Sam","email":"sam","country":"UK","message":"Hi"}"#);
        let err = run_send(SendArgs {
            kind: EnquiryKind::GeneralContact,
            input: input.path(),
            dry_run: false,
        })
        .await
        .expect_err("invalid email");
        assert!(matches!(err, AppError::Input(_)));
    }
}

