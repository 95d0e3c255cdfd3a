//! Batch driver: asset records in, labeled codes and print sheets out.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::core::{AssetRecord, CodeEncoder, PageLayoutConfig, load_records, paginate};
use crate::render::{FontSet, LabelStyle, Sheet, compose_label, save_png};

/// Asset sheet read when no other path is configured.
pub const DEFAULT_INPUT: &str = "fixed_assets.csv";
/// Directory receiving labels and print sheets.
pub const DEFAULT_OUTPUT_DIR: &str = "qr_codes";

/// Paths and geometry for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub label: LabelStyle,
    pub page: PageLayoutConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            label: LabelStyle::default(),
            page: PageLayoutConfig::A4_PRINT,
        }
    }
}

/// Milestones reported while a run progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<'a> {
    LabelSaved { uid: &'a str, path: &'a Path },
    LabelsFinished { count: usize },
    SheetsStarted { pages: usize },
    PageSaved { number: usize, path: &'a Path },
}

/// Files written by a run, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub labels: Vec<PathBuf>,
    pub pages: Vec<PathBuf>,
}

pub struct Generator<'a, E: CodeEncoder + ?Sized> {
    config: &'a GeneratorConfig,
    encoder: &'a E,
    fonts: &'a FontSet,
}

impl<'a, E: CodeEncoder + ?Sized> Generator<'a, E> {
    pub fn new(config: &'a GeneratorConfig, encoder: &'a E, fonts: &'a FontSet) -> Self {
        Self {
            config,
            encoder,
            fonts,
        }
    }

    /// Load the asset sheet, write one label per record and, when `print` is
    /// set, lay every label out on print sheets.
    ///
    /// Input and layout problems are reported before anything is written.
    pub fn run<F>(&self, print: bool, mut progress: F) -> Result<RunSummary>
    where
        F: FnMut(Progress<'_>),
    {
        if print {
            self.config
                .page
                .validate()
                .context("invalid print sheet layout")?;
        }
        let records = load_records(&self.config.input)?;
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let labels = self.write_labels(&records, &mut progress)?;
        let pages = if print {
            self.write_sheets(&records, &labels, &mut progress)?
        } else {
            Vec::new()
        };
        Ok(RunSummary { labels, pages })
    }

    pub fn label_path(&self, record: &AssetRecord) -> PathBuf {
        self.config
            .output_dir
            .join(format!("qr_{}.png", record.file_stem()))
    }

    /// One distinct label path per record, in record order. A repeated UID
    /// keeps its first path and later records get `_2`, `_3`, ... appended.
    pub fn label_paths(&self, records: &[AssetRecord]) -> Vec<PathBuf> {
        let mut seen = HashSet::with_capacity(records.len());
        records
            .iter()
            .map(|record| {
                let stem = record.file_stem();
                let mut path = self.label_path(record);
                let mut copy = 1;
                while !seen.insert(path.clone()) {
                    copy += 1;
                    path = self.config.output_dir.join(format!("qr_{stem}_{copy}.png"));
                }
                if copy > 1 {
                    tracing::warn!(
                        uid = record.uid(),
                        path = %path.display(),
                        "duplicate UID written under a suffixed name"
                    );
                }
                path
            })
            .collect()
    }

    pub fn sheet_path(&self, number: usize) -> PathBuf {
        self.config
            .output_dir
            .join(format!("print_sheet_{number}.png"))
    }

    /// Encode, caption and save each record. Returns label paths in record order.
    pub fn write_labels(
        &self,
        records: &[AssetRecord],
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(records.len());
        for (record, path) in records.iter().zip(self.label_paths(records)) {
            let code = self
                .encoder
                .encode(&record.payload())
                .with_context(|| format!("failed to encode asset {}", record.uid()))?;
            let label = compose_label(&code, record, &self.fonts.label, &self.config.label);

            save_png(&label.image, &path, None)?;
            progress(Progress::LabelSaved {
                uid: label.record.uid(),
                path: &path,
            });
            paths.push(path);
        }
        progress(Progress::LabelsFinished {
            count: paths.len(),
        });
        Ok(paths)
    }

    /// Reopen the saved labels and pack them onto sheets, one file per page.
    pub fn write_sheets(
        &self,
        records: &[AssetRecord],
        labels: &[PathBuf],
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<Vec<PathBuf>> {
        ensure!(
            records.len() == labels.len(),
            "{} records but {} labels",
            records.len(),
            labels.len()
        );
        let distinct: HashSet<&PathBuf> = labels.iter().collect();
        ensure!(
            distinct.len() == labels.len(),
            "label paths are not distinct, sheets would repeat a label"
        );
        let layout = &self.config.page;
        let plans = paginate(records.len(), layout).context("invalid print sheet layout")?;
        progress(Progress::SheetsStarted { pages: plans.len() });

        let mut pages = Vec::with_capacity(plans.len());
        for plan in &plans {
            let mut sheet = Sheet::new(layout, &self.fonts.sheet);
            for idx in plan.records.clone() {
                let code = image::open(&labels[idx])
                    .with_context(|| format!("failed to reopen {}", labels[idx].display()))?
                    .to_rgb8();
                sheet.place(&code, &records[idx].caption())?;
            }
            tracing::debug!(
                page = plan.number,
                cells = sheet.placed().len(),
                capacity = sheet.capacity(),
                "composed print sheet"
            );

            let path = self.sheet_path(plan.number);
            save_png(&sheet.into_image(), &path, Some(layout.dpi))?;
            progress(Progress::PageSaved {
                number: plan.number,
                path: &path,
            });
            pages.push(path);
        }
        Ok(pages)
    }
}
