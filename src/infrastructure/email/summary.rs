//! Summary Reporter
//!
//! Renders a `SummaryBatch` into a `Report` using `summary.html` from the
//! configured template directory. The template is read and parsed once at
//! construction and owned by the reporter afterwards.
//!
//! The source is registered under two names so that minijinja picks the
//! escaping from the name: HTML reports escape interpolated values, text
//! reports leave them as they are.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use minijinja::{context, Environment, UndefinedBehavior};

use crate::domain::entities::{Report, SummaryBatch};
use crate::domain::ports::{TargetError, TargetResult};
use crate::domain::value_objects::ReportFormat;

/// Template file looked up inside the template directory
pub const SUMMARY_TEMPLATE: &str = "summary.html";

/// Name the template is registered under for unescaped text rendering
const TEXT_TEMPLATE: &str = "summary.txt";

#[derive(Debug)]
pub struct SummaryReporter {
    env: Environment<'static>,
    template_path: PathBuf,
    cluster_name: String,
    title_prefix: String,
}

impl SummaryReporter {
    /// Load and parse `<template_dir>/summary.html`
    pub fn new(
        template_dir: impl AsRef<Path>,
        cluster_name: impl Into<String>,
        title_prefix: impl Into<String>,
    ) -> TargetResult<Self> {
        let template_path = template_dir.as_ref().join(SUMMARY_TEMPLATE);

        let source = fs::read_to_string(&template_path).map_err(|e| TargetError::Template {
            path: template_path.clone(),
            message: e.to_string(),
        })?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for name in [SUMMARY_TEMPLATE, TEXT_TEMPLATE] {
            env.add_template_owned(name, source.clone())
                .map_err(|e| TargetError::Template {
                    path: template_path.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            env,
            template_path,
            cluster_name: cluster_name.into(),
            title_prefix: title_prefix.into(),
        })
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Render a report dated today (local time)
    pub fn report(&self, batch: &SummaryBatch, format: ReportFormat) -> TargetResult<Report> {
        self.report_at(batch, format, Local::now().date_naive())
    }

    /// Render a report for the given date
    pub fn report_at(
        &self,
        batch: &SummaryBatch,
        format: ReportFormat,
        date: NaiveDate,
    ) -> TargetResult<Report> {
        let name = match format {
            ReportFormat::Html => SUMMARY_TEMPLATE,
            ReportFormat::Text => TEXT_TEMPLATE,
        };
        let template = self
            .env
            .get_template(name)
            .map_err(|e| TargetError::Render {
                message: e.to_string(),
            })?;

        let message = template
            .render(context! {
                sources => &batch.sources,
                cluster_name => &self.cluster_name,
                title_prefix => &self.title_prefix,
            })
            .map_err(|e| TargetError::Render {
                message: e.to_string(),
            })?;

        Ok(Report {
            cluster_name: self.cluster_name.clone(),
            title: self.title(date),
            message,
            format,
        })
    }

    /// `<prefix> (summary) on <cluster> from <YYYY-MM-DD>`
    pub fn title(&self, date: NaiveDate) -> String {
        format!(
            "{} (summary) on {} from {}",
            self.title_prefix,
            self.cluster_name,
            date.format("%Y-%m-%d")
        )
    }
}
