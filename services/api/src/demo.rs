use crate::infra::{
    default_workflow_config, load_directory, parse_frequency, parse_product,
    InMemoryApprovalRepository, RecordingGateway, RecordingNotifier,
};
use chrono::Local;
use clap::Args;
use credit_flow::error::AppError;
use credit_flow::workflows::credit::approvals::{
    DirectorApprovalService, SignaturePolicy, SignatureOutcome, SignatoryId,
};
use credit_flow::workflows::credit::intake::{
    ApplicationSubmission, BusinessSnapshot, FinancialSnapshot,
};
use credit_flow::workflows::credit::quote::{
    CreditQuote, LoanItem, PaymentFrequency, PricingPolicy, ProductCategory,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Amount requested
    #[arg(long)]
    pub(crate) principal: f64,
    /// Nominal annual rate, percent
    #[arg(long, default_value_t = 5.5)]
    pub(crate) rate: f64,
    /// Term in months
    #[arg(long, default_value_t = 36)]
    pub(crate) term_months: u32,
    /// Repayment cadence: annual, semi-annual, quarterly, or monthly
    #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
    pub(crate) frequency: PaymentFrequency,
    /// Product family: working-capital, equipment, green, or property
    #[arg(long, default_value = "working-capital", value_parser = parse_product)]
    pub(crate) product: ProductCategory,
    /// Quote the item exactly as configured, skipping the pricing grid
    #[arg(long)]
    pub(crate) no_pricing: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Requested amount for the demo application
    #[arg(long, default_value_t = 600_000.0)]
    pub(crate) amount: f64,
    /// Nominal annual rate, percent
    #[arg(long, default_value_t = 5.5)]
    pub(crate) rate: f64,
    /// Term in months
    #[arg(long, default_value_t = 36)]
    pub(crate) term_months: u32,
    /// Optional CSV roster of authorized signatories
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        principal,
        rate,
        term_months,
        frequency,
        product,
        no_pricing,
    } = args;

    let pricing = if no_pricing {
        PricingPolicy::passthrough()
    } else {
        PricingPolicy::standard()
    };

    let mut quote = CreditQuote::new(pricing);
    quote.add_item(LoanItem {
        product,
        principal,
        annual_rate_percent: rate,
        term_months,
        frequency,
    })?;

    let line = &quote.lines()[0];
    println!("Repayment quote");
    println!(
        "Product: {} | principal {:.2} | {} months, {} repayments",
        product.label(),
        principal,
        term_months,
        frequency.label()
    );
    println!(
        "Rate: {:.2}% requested -> {:.2}% charged",
        rate, line.charged_rate_percent
    );
    println!(
        "Periodic payment: {:.2} over {} payments",
        line.schedule.periodic_payment, line.schedule.payment_count
    );
    println!(
        "Total repayable: {:.2} (interest {:.2})",
        line.schedule.total_payments, line.schedule.total_interest
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        amount,
        rate,
        term_months,
        roster_csv,
    } = args;

    println!("SME credit application demo (run {})", Local::now().date_naive());

    let directory = load_directory(roster_csv)?;
    println!("Signatory roster ({} directors):", directory.len());
    for signatory in directory.signatories() {
        println!("- {} | {} | {}", signatory.id.0, signatory.name, signatory.role.label());
    }

    let repository = Arc::new(InMemoryApprovalRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = Arc::new(DirectorApprovalService::new(
        repository,
        notifier.clone(),
        gateway.clone(),
        directory.clone(),
        default_workflow_config(SignaturePolicy::standard()),
    ));

    let submission = demo_submission(amount, rate, term_months);
    let record = match service.submit(submission) {
        Ok(record) => record,
        Err(err) => {
            println!("Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "\nSubmitted application {} for {:.2}",
        record.request.id.0, record.request.amount
    );
    println!(
        "Required quorum: {} ({})",
        record.request.required_quorum,
        service
            .signature_policy()
            .tier(record.request.amount)
            .label()
    );
    println!("Signing window closes {}", record.request.expires_at);

    let outcome = match service.assess(&record.request.id) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("Assessment unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "\nAssessment decision: {} (score {})",
        outcome.decision.summary(),
        outcome.total_score
    );
    for component in &outcome.components {
        println!("  - {:?}: {} ({})", component.factor, component.score, component.notes);
    }

    println!("\nCollecting signatures");
    let mut finalized = false;
    for signatory in directory.signatories() {
        match service.record_signature(
            &record.request.id,
            signatory.id.clone(),
            format!("qes-{}", signatory.id.0),
        ) {
            Ok((outcome, stored)) => {
                println!(
                    "- {} signs -> {} ({}/{} signatures)",
                    signatory.name,
                    outcome.label(),
                    stored.request.approvals.len(),
                    stored.request.required_quorum
                );
                if outcome == SignatureOutcome::Finalized {
                    finalized = true;
                    break;
                }
            }
            Err(err) => {
                println!("- {} cannot sign: {err}", signatory.name);
                break;
            }
        }
    }

    if finalized {
        if let Some(first) = directory.signatories().first() {
            if let Ok((retry, _)) = service.record_signature(
                &record.request.id,
                first.id.clone(),
                format!("qes-{}", first.id.0),
            ) {
                println!("- {} retries -> {} (idempotent)", first.name, retry.label());
            }
        }
    }

    match service.get(&record.request.id) {
        Ok(stored) => {
            let view = stored.status_view();
            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("\nFinal status payload:\n{json}"),
                Err(err) => println!("\nFinal status unavailable: {err}"),
            }
        }
        Err(err) => println!("\nStatus lookup failed: {err}"),
    }

    let submissions = gateway.submissions();
    if submissions.is_empty() {
        println!("\nDownstream submissions: none");
    } else {
        println!(
            "\nDownstream submissions: {} (request {})",
            submissions.len(),
            submissions[0].0
        );
    }

    let notices = notifier.notices();
    println!("Notices dispatched: {}", notices.len());
    for notice in notices {
        println!(
            "  - {} -> {} recipient(s)",
            notice.kind.label(),
            notice.recipients.len()
        );
    }

    Ok(())
}

fn demo_submission(amount: f64, rate: f64, term_months: u32) -> ApplicationSubmission {
    // Financials scaled so the rubric approves at any sensible demo amount.
    ApplicationSubmission {
        business: BusinessSnapshot {
            legal_name: "Cathedral Quarter Roasters Ltd".to_string(),
            registration_number: "IE538201".to_string(),
            years_trading: 7,
        },
        financials: FinancialSnapshot {
            annual_revenue: amount * 4.0,
            annual_net_profit: amount * 0.8 + 20_000.0,
            existing_annual_debt_service: 15_000.0,
        },
        requested_items: vec![LoanItem {
            product: ProductCategory::WorkingCapital,
            principal: amount,
            annual_rate_percent: rate,
            term_months,
            frequency: PaymentFrequency::Monthly,
        }],
        submitter_id: SignatoryId("dir-aoife".to_string()),
    }
}
