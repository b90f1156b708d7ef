use crate::cli::RenderArgs;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use xltemplate::{Settings, Templator};

pub fn run(args: RenderArgs) -> Result<()> {
    let settings = Settings::from_path(&args.settings)
        .with_context(|| format!("loading settings from {}", args.settings.display()))?;

    let out = args.out.unwrap_or_else(|| default_output(&args.template));
    let Some(file_name) = out.file_name().and_then(|n| n.to_str()) else {
        bail!("output path {} has no file name", out.display());
    };
    let out_dir = match out.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut templator = Templator::new(&args.template, Some(out_dir), Some(file_name))?;
    templator.set_ignore_empty_cells(!args.include_empty);
    if let Some(bound) = &args.right_bound {
        templator.set_right_bound_column(bound)?;
    }

    let report = templator
        .render(Some(settings), args.sheet)
        .with_context(|| format!("rendering {}", args.template.display()))?;
    for key in &report.missing_scalars {
        tracing::warn!(key = %key, "no value for placeholder; rendered empty");
    }
    for key in &report.missing_loops {
        tracing::warn!(key = %key, "no data for loop; block left unexpanded");
    }

    let saved = templator.save(None)?;
    println!("{}: {report}", saved.display());
    Ok(())
}

/// `dir/name.ext` becomes `dir/name.rendered.ext`.
fn default_output(template: &Path) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    let name = match template.extension() {
        Some(ext) => format!("{stem}.rendered.{}", ext.to_string_lossy()),
        None => format!("{stem}.rendered"),
    };
    template.with_file_name(name)
}
