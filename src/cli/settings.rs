use anyhow::{Context, Result};

use domdb::search::{SearchOptions, SEARCH_KEYS};

use super::{AsciiTable, Session};

fn print_settings(options: &SearchOptions) {
    let mut table = AsciiTable::new(["setting", "value"]);
    for (key, value) in options.entries() {
        table.push([key.to_string(), value]);
    }
    table.print();
}

/// Show all settings, or set one and persist the config file
pub fn run_set(session: &mut Session, key: Option<String>, value: Option<String>) -> Result<()> {
    let (Some(key), Some(value)) = (key, value) else {
        print_settings(&session.config.search);
        return Ok(());
    };

    session
        .config
        .search
        .set_key(&key, &value)
        .with_context(|| format!("Cannot set {} (known settings: {})", key, SEARCH_KEYS.join(", ")))?;
    // Refuse to persist a combination the engine would reject
    session.search_config()?;
    session.config.save(&session.config_path)?;
    print_settings(&session.config.search);
    Ok(())
}

/// Restore one setting, or all of them, and persist the config file
pub fn run_reset(session: &mut Session, key: Option<String>) -> Result<()> {
    match key {
        Some(key) => session
            .config
            .search
            .reset_key(&key)
            .with_context(|| format!("Cannot reset {}", key))?,
        None => session.config.search = SearchOptions::default(),
    }
    session.search_config()?;
    session.config.save(&session.config_path)?;
    print_settings(&session.config.search);
    Ok(())
}
