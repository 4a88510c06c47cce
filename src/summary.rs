//! Append-only scalar summary stream, the side channel the training loop
//! writes named metrics into. One JSON object per line, flushed per write so
//! a crashed run keeps everything logged up to the failure.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarEvent {
    pub stage: String,
    pub tag: String,
    pub value: f32,
    pub step: u64,
}

pub struct SummaryWriter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl SummaryWriter {
    /// Open (or append to) the event stream under `outdir`.
    pub fn create(outdir: &Path) -> io::Result<Self> {
        fs::create_dir_all(outdir)?;
        let path = outdir.join("events.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            out: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one stage-qualified scalar tagged with the current step.
    pub fn scalar(&mut self, stage: &str, tag: &str, value: f32, step: u64) -> io::Result<()> {
        let event = ScalarEvent {
            stage: stage.to_string(),
            tag: tag.to_string(),
            value,
            step,
        };
        serde_json::to_writer(&mut self.out, &event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    /// Append a batch of metrics under one stage.
    pub fn scalars<'a, I>(&mut self, stage: &str, metrics: I, step: u64) -> io::Result<()>
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        for (tag, value) in metrics {
            self.scalar(stage, tag, value, step)?;
        }
        Ok(())
    }
}
