//
//  gocd-cli
//  cli/environment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Environment commands

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::api::{Environment, Environments};
use crate::output::{print_field, print_header, OutputWriter, TableBuilder, TableOutput};

use super::pipeline::report;
use super::{read_json, GlobalOptions};

/// Manage environments.
#[derive(Args, Debug)]
pub struct EnvironmentCommand {
    #[command(subcommand)]
    pub command: EnvironmentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EnvironmentSubcommand {
    /// List environments
    #[command(visible_alias = "ls")]
    List,

    /// Show an environment
    Get(NameArgs),

    /// Create an environment from a JSON file
    Create(FileArgs),

    /// Replace an environment with the contents of a JSON file
    Update(FileArgs),

    /// Delete an environment
    Delete(NameArgs),
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// Environment name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// JSON file with the environment; `-` reads stdin
    pub file: PathBuf,
}

fn member_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

impl TableOutput for Environment {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        print_field(
            "Pipelines",
            &member_list(self.pipelines.iter().map(|p| p.name.as_str())),
            color,
        );
        print_field(
            "Agents",
            &member_list(self.agents.iter().map(|a| a.uuid.as_str())),
            color,
        );

        if !self.environment_variables.is_empty() {
            println!();
            let mut table = TableBuilder::new().color(color).headers(["Variable", "Value"]);
            for var in &self.environment_variables {
                let value = if var.secure {
                    "********".to_string()
                } else {
                    var.value.clone().unwrap_or_default()
                };
                table = table.row([var.name.clone(), value]);
            }
            table.print();
        }
    }
}

impl TableOutput for Environments {
    fn print_table(&self, color: bool) {
        if self.as_slice().is_empty() {
            println!("No environments found");
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["Name", "Pipelines", "Agents", "Variables"]);
        for env in self.as_slice() {
            table = table.row([
                env.name.clone(),
                member_list(env.pipelines.iter().map(|p| p.name.as_str())),
                env.agents.len().to_string(),
                env.environment_variables.len().to_string(),
            ]);
        }
        table.print();
    }
}

impl EnvironmentCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            EnvironmentSubcommand::List => self.list(global).await,
            EnvironmentSubcommand::Get(args) => self.get(args, global).await,
            EnvironmentSubcommand::Create(args) => self.create(args, global).await,
            EnvironmentSubcommand::Update(args) => self.update(args, global).await,
            EnvironmentSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let environments = client.environments().await?;
        let writer = OutputWriter::new(global.format());
        if global.json {
            writer.write_list(environments.as_slice())
        } else {
            writer.write(&environments)
        }
    }

    async fn get(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let env = client.environment(&args.name).await?;
        OutputWriter::new(global.format()).write(&env)
    }

    async fn create(&self, args: &FileArgs, global: &GlobalOptions) -> Result<()> {
        let env: Environment = read_json(&args.file)?;
        let mut client = global.client()?;
        client.create_environment(&env).await?;
        report(global, json!({"environment": env.name, "created": true}), || {
            format!("Created environment {}", style(&env.name).cyan())
        })
    }

    /// Reads the current environment to pick up its ETag, then replaces it.
    async fn update(&self, args: &FileArgs, global: &GlobalOptions) -> Result<()> {
        let env: Environment = read_json(&args.file)?;
        let mut client = global.client()?;
        client.environment(&env.name).await?;
        client.replace_environment(&env).await?;
        report(global, json!({"environment": env.name, "updated": true}), || {
            format!("Updated environment {}", style(&env.name).cyan())
        })
    }

    /// Reads the environment first; delete requires its ETag.
    async fn delete(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        client.environment(&args.name).await?;
        client.delete_environment(&args.name).await?;
        report(global, json!({"environment": args.name, "deleted": true}), || {
            format!("Deleted environment {}", style(&args.name).cyan())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_member_list() {
        assert_eq!(member_list(std::iter::empty()), "-");
        assert_eq!(member_list(["build", "deploy"].into_iter()), "build, deploy");
    }

    #[test]
    fn test_parse_env_alias() {
        let cli = Cli::try_parse_from(["gocd", "environment", "delete", "qa"]).unwrap();
        match cli.command {
            Commands::Env(cmd) => match cmd.command {
                EnvironmentSubcommand::Delete(args) => assert_eq!(args.name, "qa"),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
