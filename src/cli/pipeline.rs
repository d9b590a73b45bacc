//
//  gocd-cli
//  cli/pipeline.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline commands.
//!
//! Run history and execution control (`instance`, `history`, `pause`,
//! `unpause`, `schedule`) plus the pipeline configuration admin commands
//! under `pipeline config`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::api::{PipelineConfig, PipelineInstance, PipelineInstances};
use crate::output::{
    format_bool, format_result, print_field, print_header, truncate, write_json, OutputFormat,
    OutputWriter, TableBuilder, TableOutput,
};

use super::{read_input, read_json, GlobalOptions};

/// Inspect and control pipelines.
#[derive(Args, Debug)]
pub struct PipelineCommand {
    #[command(subcommand)]
    pub command: PipelineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineSubcommand {
    /// Show one run of a pipeline
    Instance(InstanceArgs),

    /// Show the run history of a pipeline
    History(HistoryArgs),

    /// Pause a pipeline
    Pause(NameArgs),

    /// Unpause a pipeline
    Unpause(NameArgs),

    /// Schedule a pipeline run
    #[command(visible_alias = "trigger")]
    Schedule(ScheduleArgs),

    /// Manage pipeline configuration
    Config(PipelineConfigCommand),
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// Pipeline name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct InstanceArgs {
    /// Pipeline name
    pub name: String,

    /// Run counter
    pub counter: u64,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Pipeline name
    pub name: String,

    /// Maximum number of runs to show
    #[arg(long, short = 'L', default_value = "10")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Pipeline name
    pub name: String,

    /// File with the schedule payload (material revisions, variables); `-` reads stdin
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,
}

/// Manage pipeline configuration.
#[derive(Args, Debug)]
pub struct PipelineConfigCommand {
    #[command(subcommand)]
    pub command: PipelineConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineConfigSubcommand {
    /// Show a pipeline configuration
    Get(NameArgs),

    /// Create a pipeline from a JSON file
    Create(CreateArgs),

    /// Replace a pipeline configuration with the contents of a JSON file
    Update(FileArgs),

    /// Delete a pipeline and remove it from its environment
    Delete(NameArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Pipeline group to create the pipeline in
    #[arg(long, short = 'g')]
    pub group: String,

    /// JSON file with the pipeline configuration; `-` reads stdin
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// JSON file with the pipeline configuration; `-` reads stdin
    pub file: PathBuf,
}

impl TableOutput for PipelineInstance {
    fn print_table(&self, color: bool) {
        let title = format!("{} #{} ({})", self.name, self.counter, self.label);
        print_header(&title);

        if let Some(cause) = &self.build_cause {
            print_field("Triggered", &cause.trigger_message, color);
            if !cause.approver.is_empty() {
                print_field("Approver", &cause.approver, color);
            }
            print_field("Forced", &format_bool(cause.trigger_forced, color), color);
        }
        if let Some(comment) = &self.comment {
            print_field("Comment", comment, color);
        }
        println!();

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["Stage", "Run", "Result", "Jobs"]);
        for stage in &self.stages {
            let jobs = stage
                .jobs
                .iter()
                .map(|j| format!("{} ({})", j.name, j.result))
                .collect::<Vec<_>>()
                .join(", ");
            table = table.row([
                stage.name.clone(),
                stage.counter.clone(),
                format_result(stage.result.as_deref().unwrap_or("Unknown"), color),
                jobs,
            ]);
        }
        table.print();
    }
}

impl TableOutput for PipelineInstances {
    fn print_table(&self, color: bool) {
        if self.pipelines.is_empty() {
            println!("No runs found");
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["#", "Label", "Stages", "Triggered"]);
        for run in &self.pipelines {
            let stages = run
                .stages
                .iter()
                .map(|s| format!("{}: {}", s.name, format_result(s.result.as_deref().unwrap_or("-"), color)))
                .collect::<Vec<_>>()
                .join(", ");
            let trigger = run
                .build_cause
                .as_ref()
                .map(|c| truncate(&c.trigger_message, 50))
                .unwrap_or_else(|| "-".to_string());
            table = table.row([run.counter.to_string(), run.label.clone(), stages, trigger]);
        }
        table.print();

        if let Some(page) = &self.pagination {
            println!(
                "Showing {} of {} runs",
                self.pipelines.len(),
                page.total
            );
        }
    }
}

impl TableOutput for PipelineConfig {
    fn print_table(&self, color: bool) {
        print_header(&self.name);
        if let Some(label) = &self.label_template {
            print_field("Label template", label, color);
        }
        print_field("Locking", &format_bool(self.enable_pipeline_locking, color), color);
        if let Some(template) = &self.template {
            print_field("Template", template, color);
        }
        if let Some(timer) = &self.timer {
            print_field("Timer", &timer.spec, color);
        }
        println!();

        if !self.materials.is_empty() {
            let mut table = TableBuilder::new().color(color).headers(["Material", "Source"]);
            for material in &self.materials {
                let source = material
                    .attributes
                    .get("url")
                    .or_else(|| material.attributes.get("pipeline"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("-");
                table = table.row([material.material_type.as_str(), source]);
            }
            table.print();
        }

        if !self.stages().is_empty() {
            let mut table = TableBuilder::new()
                .color(color)
                .headers(["Stage", "Approval", "Jobs"]);
            for stage in self.stages() {
                let approval = stage
                    .approval
                    .as_ref()
                    .map(|a| a.approval_type.clone())
                    .unwrap_or_else(|| "success".to_string());
                let jobs = stage
                    .jobs
                    .iter()
                    .map(|j| j.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                table = table.row([stage.name.clone(), approval, jobs]);
            }
            table.print();
        }
    }
}

impl PipelineCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PipelineSubcommand::Instance(args) => self.instance(args, global).await,
            PipelineSubcommand::History(args) => self.history(args, global).await,
            PipelineSubcommand::Pause(args) => self.pause(args, global).await,
            PipelineSubcommand::Unpause(args) => self.unpause(args, global).await,
            PipelineSubcommand::Schedule(args) => self.schedule(args, global).await,
            PipelineSubcommand::Config(config) => config.run(global).await,
        }
    }

    /// Show one run
    async fn instance(&self, args: &InstanceArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let instance = client.pipeline_instance(&args.name, args.counter).await?;
        OutputWriter::new(global.format()).write(&instance)
    }

    /// Show run history
    async fn history(&self, args: &HistoryArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let mut history = client.pipeline_history(&args.name).await?;
        history.pipelines.truncate(args.limit);
        OutputWriter::new(global.format()).write(&history)
    }

    /// Pause a pipeline
    async fn pause(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        client.pause_pipeline(&args.name).await?;
        report(global, json!({"pipeline": args.name, "paused": true}), || {
            format!("Paused pipeline {}", style(&args.name).cyan())
        })
    }

    /// Unpause a pipeline
    async fn unpause(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        client.unpause_pipeline(&args.name).await?;
        report(global, json!({"pipeline": args.name, "paused": false}), || {
            format!("Unpaused pipeline {}", style(&args.name).cyan())
        })
    }

    /// Schedule a run
    async fn schedule(&self, args: &ScheduleArgs, global: &GlobalOptions) -> Result<()> {
        let payload = match &args.data {
            Some(path) => read_input(path)?,
            None => Vec::new(),
        };

        let mut client = global.client()?;
        client.schedule_pipeline(&args.name, payload).await?;
        report(global, json!({"pipeline": args.name, "scheduled": true}), || {
            format!("Scheduled pipeline {}", style(&args.name).cyan())
        })
    }
}

impl PipelineConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PipelineConfigSubcommand::Get(args) => self.get(args, global).await,
            PipelineConfigSubcommand::Create(args) => self.create(args, global).await,
            PipelineConfigSubcommand::Update(args) => self.update(args, global).await,
            PipelineConfigSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn get(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let config = client.pipeline_config(&args.name).await?;
        OutputWriter::new(global.format()).write(&config)
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let config: PipelineConfig = read_json(&args.file)?;
        let mut client = global.client()?;
        client.create_pipeline_config(&config, &args.group).await?;
        report(global, json!({"pipeline": config.name, "group": args.group, "created": true}), || {
            format!(
                "Created pipeline {} in group {}",
                style(&config.name).cyan(),
                style(&args.group).cyan()
            )
        })
    }

    /// Reads the current config to pick up its ETag, then replaces it.
    async fn update(&self, args: &FileArgs, global: &GlobalOptions) -> Result<()> {
        let config: PipelineConfig = read_json(&args.file)?;
        let mut client = global.client()?;
        client.pipeline_config(&config.name).await?;
        client.replace_pipeline_config(&config).await?;
        report(global, json!({"pipeline": config.name, "updated": true}), || {
            format!("Updated pipeline {}", style(&config.name).cyan())
        })
    }

    async fn delete(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let mut client = global.client()?;
        let environment = client.delete_pipeline_config(&args.name).await?;
        report(
            global,
            json!({"pipeline": args.name, "deleted": true, "environment": environment}),
            || match &environment {
                Some(env) => format!(
                    "Deleted pipeline {} and removed it from environment {}",
                    style(&args.name).cyan(),
                    style(env).cyan()
                ),
                None => format!("Deleted pipeline {}", style(&args.name).cyan()),
            },
        )
    }
}

/// Prints `value` in JSON mode, otherwise the message built by `message`.
pub(super) fn report(
    global: &GlobalOptions,
    value: serde_json::Value,
    message: impl FnOnce() -> String,
) -> Result<()> {
    match global.format() {
        OutputFormat::Json => write_json(&value),
        OutputFormat::Table => {
            OutputWriter::table().write_success(&message());
            Ok(())
        }
    }
}
