//! `kokoro check` - verify the completion provider answers.

use std::time::Instant;

use kokoro_infra::config::resolve_api_key;
use kokoro_infra::llm::{create_provider, test_provider_connection};
use kokoro_types::config::AppConfig;

pub async fn check_provider(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let result = match create_provider(
        &config.llm,
        &config.chat.model,
        resolve_api_key(&config.llm),
    ) {
        Ok(provider) => test_provider_connection(&provider).await,
        Err(e) => Err(e),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if json {
        let check = serde_json::json!({
            "provider": config.llm.provider_name,
            "model": config.chat.model,
            "ok": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
            "response_time_ms": elapsed_ms,
        });
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        println!();
        match &result {
            Ok(()) => println!(
                "  {} {} ({}) responded in {elapsed_ms}ms",
                console::style("✓").green(),
                console::style(&config.llm.provider_name).cyan(),
                config.chat.model
            ),
            Err(e) => println!(
                "  {} {} ({}): {e}",
                console::style("✗").red(),
                console::style(&config.llm.provider_name).cyan(),
                config.chat.model
            ),
        }
        println!();
    }

    result.map_err(Into::into)
}
