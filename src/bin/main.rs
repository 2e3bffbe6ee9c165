use scam_agent_interceptor::{Config, Interceptor};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    dotenv::dotenv().ok();

    info!("Scam Agent Interceptor starting");

    let config = Config::from_env();
    let interceptor = Interceptor::from_config(&config)?;

    // Walk a sample scammer conversation through the pipeline
    let session_key = "demo-session";
    let messages = [
        "Dear customer, your KYC will expire today. Call 9876543210 immediately!",
        "Sir please verify now at http://kyc-update.top or account will be blocked",
        "Pay the reactivation fee of Rs 500 to support@fraudpay within 24 hours",
        "Are you there? This is your last warning before we suspend everything",
    ];

    for text in messages {
        let result = interceptor.analyze(session_key, text).await?;

        println!("\n=== INBOUND ===");
        println!("{}", text);
        println!(
            "Category: {} (confidence {:.2})",
            result.classification.category, result.classification.confidence
        );
        println!(
            "Verdict: {} (score {:.2}), {} finding(s)",
            result.verdict.tier,
            result.verdict.score,
            result.findings.len()
        );
        for finding in &result.findings {
            println!(
                "  - [{}] {} → {} ({})",
                finding.entity.kind,
                finding.entity.value,
                finding.tier,
                finding.flag
            );
        }
        println!("Stage: {}", result.stage);
        println!("Agent reply: {}", result.reply);
    }

    Ok(())
}
