//! Format validation demo: the validator family, options and field rules

use elif_validation::{
    FormatKind, FormatValidator, MailFormatValidator, Rules, Validate, ValidationOptions,
};
use serde_json::{json, Value};
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("elif-validation demo");
    println!("====================\n");

    demo_validators();
    demo_mail();
    demo_rules().await?;

    println!("\nAll validation demos completed.");
    Ok(())
}

fn demo_validators() {
    println!("Format validators");
    println!("-----------------");

    let options = ValidationOptions::DEFAULT;
    let cases: [(FormatKind, Value, ValidationOptions); 6] = [
        (FormatKind::Alphabet, json!("hello"), options),
        (FormatKind::Alphabet, json!("hello world"), options),
        (FormatKind::Alphabet, json!("hello world"), options.with_whitespace()),
        (FormatKind::Alphanumeric, json!("abc123"), options),
        (FormatKind::UpperAlphabet, json!("Abc"), options),
        (FormatKind::FullSizeString, json!("ＡＢＣ"), options),
    ];

    for (kind, value, options) in cases {
        let validator = FormatValidator::from_kind(kind);
        match validator.check(&value, &options) {
            Ok(()) => println!("  {:<18} {} ok", kind, value),
            Err(violation) => println!("  {:<18} {} rejected ({})", kind, value, violation.code()),
        }
    }
}

fn demo_mail() {
    println!("\nMail addresses");
    println!("--------------");

    let validator = MailFormatValidator::new();
    for address in ["user@example.com", "plainaddress", "us..er@example.com"] {
        match validator.check(&json!(address), &ValidationOptions::DEFAULT) {
            Ok(()) => println!("  {} ok", address),
            Err(violation) => println!("  {} rejected: {}", address, violation),
        }
    }
}

async fn demo_rules() -> Result<(), Box<dyn std::error::Error>> {
    println!("\nField rules");
    println!("-----------");

    let rules = Rules::new()
        .format(
            "nickname",
            FormatKind::Alphanumeric,
            ValidationOptions::DEFAULT.with_range(3, 12),
        )
        .format("country", FormatKind::UpperAlphabet, ValidationOptions::DEFAULT.with_range(2, 2))
        .mail("mail", ValidationOptions::DEFAULT.with_nullable());

    let mut data = HashMap::new();
    data.insert("nickname".to_string(), json!("ab"));
    data.insert("country".to_string(), json!("jp"));

    match rules.validate(&data).await {
        Ok(()) => println!("  request is valid"),
        Err(errors) => {
            println!("  {}", errors);
            println!("  {}", serde_json::to_string_pretty(&errors.to_json())?);
        }
    }

    Ok(())
}
