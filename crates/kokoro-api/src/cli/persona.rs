//! `kokoro personas` - print the persona table.

use kokoro_core::persona::PersonaRegistry;

pub fn list_personas(registry: &PersonaRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.summaries())?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} personas",
        console::style("♥").magenta().bold(),
        registry.len()
    );
    println!();
    for persona in registry.personas() {
        println!(
            "  {:<10} {}",
            console::style(&persona.id).cyan(),
            persona.name
        );
    }
    println!();
    Ok(())
}
