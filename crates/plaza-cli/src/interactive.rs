//! Interactive flow for the install and setup commands.
//!
//! Collects the project name, component choices, and database settings.
//! Uses dialoguer for terminal UI prompts.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use plaza_core::config::{DatabaseConfig, ProjectDefaults};

/// Pre-filled values from CLI args that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledOptions {
    /// Project directory name - if Some, skip the name prompt
    pub directory: Option<String>,
    pub install_storefront: Option<bool>,
    pub install_vendor_panel: Option<bool>,
    /// Database settings - if Some, skip all database prompts
    pub database: Option<DatabaseConfig>,
    /// Non-interactive: every remaining prompt takes its default
    pub yes: bool,
}

/// Result of the interactive flow.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub directory: String,
    pub install_storefront: bool,
    pub install_vendor_panel: bool,
    /// `None` means use the configured default database.
    pub database: Option<DatabaseConfig>,
    /// Whether the user confirmed the plan
    pub confirmed: bool,
}

/// Interactive flow for collecting an install plan.
pub struct InteractiveFlow<W: Write = io::Stdout> {
    defaults: ProjectDefaults,
    prefilled: PrefilledOptions,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl InteractiveFlow<io::Stdout> {
    /// Create a new interactive flow with stdout.
    pub fn new(defaults: ProjectDefaults, prefilled: PrefilledOptions) -> Self {
        Self {
            defaults,
            prefilled,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> InteractiveFlow<W> {
    /// Create a new interactive flow with custom writer (for testing).
    #[cfg(test)]
    pub fn with_writer(defaults: ProjectDefaults, prefilled: PrefilledOptions, writer: W) -> Self {
        Self {
            defaults,
            prefilled,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the flow and collect an install plan.
    ///
    /// Flow:
    /// 1. Project name
    /// 2. Install storefront?
    /// 3. Install vendor panel?
    /// 4. Use the configured database, or enter connection settings
    /// 5. Show summary and confirm
    pub fn collect(&mut self) -> Result<InstallPlan> {
        self.print_header()?;

        let directory = self.prompt_directory()?;
        let install_storefront =
            self.prompt_confirm("Install storefront?", self.defaults.install_storefront, |p| {
                p.install_storefront
            })?;
        let install_vendor_panel = self.prompt_confirm(
            "Install vendor panel?",
            self.defaults.install_vendor_panel,
            |p| p.install_vendor_panel,
        )?;
        let database = self.prompt_database()?;

        let plan = InstallPlan {
            directory,
            install_storefront,
            install_vendor_panel,
            database,
            confirmed: false,
        };
        let confirmed = self.show_summary_and_confirm(&plan)?;

        Ok(InstallPlan { confirmed, ..plan })
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Plaza Marketplace Setup").bold().cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn prompt_directory(&self) -> Result<String> {
        if let Some(directory) = &self.prefilled.directory {
            return Ok(directory.clone());
        }
        if self.prefilled.yes {
            return Ok(self.defaults.project_name.clone());
        }

        let name: String = Input::with_theme(&self.theme)
            .with_prompt("What is your project name?")
            .default(self.defaults.project_name.clone())
            .interact_text()?;
        Ok(name)
    }

    fn prompt_confirm(
        &self,
        prompt: &str,
        default: bool,
        prefilled: impl Fn(&PrefilledOptions) -> Option<bool>,
    ) -> Result<bool> {
        if let Some(value) = prefilled(&self.prefilled) {
            return Ok(value);
        }
        if self.prefilled.yes {
            return Ok(default);
        }

        let value = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(value)
    }

    fn prompt_database(&self) -> Result<Option<DatabaseConfig>> {
        if let Some(database) = &self.prefilled.database {
            return Ok(Some(database.clone()));
        }

        let use_existing = self.prompt_confirm(
            "Use the configured database?",
            self.defaults.use_existing_db,
            |_| None,
        )?;
        if use_existing {
            return Ok(None);
        }

        let input = |prompt: &str, default: &str| -> Result<String> {
            let value: String = Input::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()?;
            Ok(value)
        };

        Ok(Some(DatabaseConfig {
            host: input("Database address", "localhost")?,
            port: input("Database port", "5432")?,
            user: input("Database user", "postgres")?,
            password: input("Database password", "postgres")?,
            name: input("Database name", "plaza")?,
        }))
    }

    fn show_summary_and_confirm(&mut self, plan: &InstallPlan) -> Result<bool> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        writeln!(self.writer, "  Project:      {}", style(&plan.directory).green())?;
        writeln!(
            self.writer,
            "  Storefront:   {}",
            style(yes_no(plan.install_storefront)).green()
        )?;
        writeln!(
            self.writer,
            "  Vendor panel: {}",
            style(yes_no(plan.install_vendor_panel)).green()
        )?;
        let db = match &plan.database {
            Some(db) => format!("{}:{}/{}", db.host, db.port, db.name),
            None => "configured default".to_string(),
        };
        writeln!(self.writer, "  Database:     {}", style(db).green())?;
        writeln!(self.writer)?;

        if self.prefilled.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Proceed with installation?")
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ProjectDefaults {
        ProjectDefaults {
            project_name: "plaza-marketplace".to_string(),
            install_storefront: true,
            install_vendor_panel: true,
            use_existing_db: true,
            region: "us".to_string(),
        }
    }

    fn custom_db() -> DatabaseConfig {
        DatabaseConfig {
            host: "db.example.net".to_string(),
            port: "5433".to_string(),
            user: "owner".to_string(),
            password: "hunter2".to_string(),
            name: "marketplace".to_string(),
        }
    }

    #[test]
    fn prefilled_options_default_is_empty() {
        let prefilled = PrefilledOptions::default();
        assert!(prefilled.directory.is_none());
        assert!(prefilled.install_storefront.is_none());
        assert!(prefilled.database.is_none());
        assert!(!prefilled.yes);
    }

    #[test]
    fn fully_prefilled_flow_skips_prompts() {
        let prefilled = PrefilledOptions {
            directory: Some("demo".to_string()),
            install_storefront: Some(false),
            install_vendor_panel: Some(true),
            database: Some(custom_db()),
            yes: true,
        };

        let mut output = Vec::new();
        let mut flow = InteractiveFlow::with_writer(defaults(), prefilled, &mut output);
        let plan = flow.collect().unwrap();

        assert!(plan.confirmed);
        assert_eq!(plan.directory, "demo");
        assert!(!plan.install_storefront);
        assert!(plan.install_vendor_panel);
        assert_eq!(plan.database, Some(custom_db()));
    }

    #[test]
    fn yes_flag_takes_defaults_for_missing_answers() {
        let prefilled = PrefilledOptions {
            yes: true,
            ..Default::default()
        };

        let mut output = Vec::new();
        let mut flow = InteractiveFlow::with_writer(defaults(), prefilled, &mut output);
        let plan = flow.collect().unwrap();

        assert!(plan.confirmed);
        assert_eq!(plan.directory, "plaza-marketplace");
        assert!(plan.install_storefront);
        assert!(plan.install_vendor_panel);
        assert!(plan.database.is_none(), "defaults use the configured database");
    }

    #[test]
    fn prefilled_database_bypasses_db_prompts() {
        let prefilled = PrefilledOptions {
            directory: Some("demo".to_string()),
            install_storefront: Some(true),
            install_vendor_panel: Some(true),
            database: Some(custom_db()),
            yes: true,
        };

        let mut output = Vec::new();
        let mut flow = InteractiveFlow::with_writer(defaults(), prefilled, &mut output);
        let plan = flow.collect().unwrap();

        assert_eq!(plan.database.unwrap().host, "db.example.net");
    }

    #[test]
    fn summary_shows_collected_values() {
        let prefilled = PrefilledOptions {
            directory: Some("demo".to_string()),
            install_storefront: Some(true),
            install_vendor_panel: Some(false),
            database: None,
            yes: true,
        };

        let mut output = Vec::new();
        let mut flow = InteractiveFlow::with_writer(defaults(), prefilled, &mut output);
        flow.collect().unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("Summary"));
        assert!(output_str.contains("demo"));
        assert!(output_str.contains("configured default"));
    }
}
