use crate::output::print_json;
use clap::Subcommand;
use llm_client::Vendor;
use std::path::Path;
use vibeplan_core::config::AiConfig;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the AI provider settings (the key is redacted)
    Show,
    /// Change AI provider settings
    Set {
        /// openai, claude or google
        #[arg(long)]
        provider: Option<String>,
        /// Model override; pass an empty string to use the provider default
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Remove the stored settings
    Clear,
}

pub fn run(data_dir: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(data_dir, json),
        ConfigSubcommand::Set {
            provider,
            model,
            api_key,
        } => {
            let provider = provider.map(|p| p.parse::<Vendor>()).transpose()?;
            set(data_dir, provider, model, api_key, json)
        }
        ConfigSubcommand::Clear => clear(data_dir, json),
    }
}

fn print_view(config: &AiConfig, json: bool) -> anyhow::Result<()> {
    let view = config.view();
    if json {
        return print_json(&view);
    }
    println!("Provider:  {}", view.provider);
    println!("Model:     {}", view.model);
    match &view.api_key_hint {
        Some(hint) => println!("API key:   {hint}"),
        None => println!("API key:   (not set)"),
    }
    Ok(())
}

fn show(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let config = AiConfig::load(data_dir)?;
    print_view(&config, json)
}

fn set(
    data_dir: &Path,
    provider: Option<Vendor>,
    model: Option<String>,
    api_key: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = AiConfig::load(data_dir)?;
    if let Some(provider) = provider {
        config.set_provider(provider);
    }
    if let Some(model) = model {
        let model = model.trim().to_string();
        config.model = (!model.is_empty()).then_some(model);
    }
    if let Some(key) = api_key {
        config.api_key = key.trim().to_string();
    }
    config.save(data_dir)?;
    tracing::debug!(provider = %config.provider, "saved ai config");
    print_view(&config, json)
}

fn clear(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let cleared = AiConfig::clear(data_dir)?;

    if json {
        print_json(&serde_json::json!({ "cleared": cleared }))?;
    } else if cleared {
        println!("Cleared AI settings.");
    } else {
        println!("No AI settings stored.");
    }
    Ok(())
}
