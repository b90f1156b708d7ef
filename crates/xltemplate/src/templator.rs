use crate::config::RenderConfig;
use crate::error::TemplatorError;
use crate::renderer::{RenderReport, SheetRenderer};
use crate::settings::Settings;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fs;
use std::path::{Path, PathBuf};
use xltemplate_common::ColumnBound;
use xltemplate_workbook::{GridWorkbook, open_workbook};

/// Characters kept verbatim in a download file name; everything else is
/// percent-encoded (RFC 3986 unreserved set).
const FILE_NAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const CONTENT_TYPE: &str = "application/vnd.ms-excel; charset=UTF-8";

/// A rendered workbook packaged for HTTP delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Download {
    fn new(file_name: &str, body: Vec<u8>) -> Self {
        let encoded = utf8_percent_encode(file_name, FILE_NAME_SET);
        Self {
            file_name: file_name.to_string(),
            headers: vec![
                ("Content-Type", CONTENT_TYPE.to_string()),
                (
                    "Content-Disposition",
                    format!("attachment;filename=\"{encoded}\""),
                ),
                ("Cache-Control", "max-age=0".to_string()),
            ],
            body,
        }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// File-level driver: load a template, render one sheet, save or stream it.
///
/// The template is only read when first needed. Settings given to
/// [`Templator::render`] are kept for later renders.
pub struct Templator {
    template_path: PathBuf,
    output_dir: Option<PathBuf>,
    output_file_name: Option<String>,
    settings: Option<Settings>,
    config: RenderConfig,
    workbook: Option<Box<dyn GridWorkbook>>,
}

impl Templator {
    /// Check that the template is a readable file and, when given, that the
    /// output directory exists and is writable.
    pub fn new(
        template: impl AsRef<Path>,
        output_dir: Option<&Path>,
        output_file_name: Option<&str>,
    ) -> Result<Self, TemplatorError> {
        let template_path = template.as_ref().to_path_buf();
        let readable = fs::metadata(&template_path).is_ok_and(|m| m.is_file())
            && fs::File::open(&template_path).is_ok();
        if !readable {
            return Err(TemplatorError::TemplateNotReadable {
                path: template_path,
            });
        }
        if let Some(dir) = output_dir {
            let writable =
                fs::metadata(dir).is_ok_and(|m| m.is_dir() && !m.permissions().readonly());
            if !writable {
                return Err(TemplatorError::OutputDirNotWritable {
                    path: dir.to_path_buf(),
                });
            }
        }
        Ok(Self {
            template_path,
            output_dir: output_dir.map(Path::to_path_buf),
            output_file_name: output_file_name.map(str::to_string),
            settings: None,
            config: RenderConfig::default(),
            workbook: None,
        })
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn set_ignore_empty_cells(&mut self, ignore: bool) {
        self.config.ignore_empty_cells = ignore;
    }

    /// Bound the scan at the given column (exclusive). Only one or two
    /// uppercase letters are accepted.
    pub fn set_right_bound_column(&mut self, letters: &str) -> Result<(), TemplatorError> {
        self.config.right_bound_column = Some(ColumnBound::parse(letters)?);
        Ok(())
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = Some(settings);
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.workbook.is_some()
    }

    /// Read the template from disk, replacing any previously loaded copy.
    pub fn load_template(&mut self) -> Result<(), TemplatorError> {
        self.workbook = Some(self.open_template()?);
        Ok(())
    }

    fn open_template(&self) -> Result<Box<dyn GridWorkbook>, TemplatorError> {
        let book = open_workbook(&self.template_path).map_err(|source| TemplatorError::Load {
            name: self
                .template_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            source,
        })?;
        #[cfg(feature = "tracing")]
        tracing::info!(
            template = %self.template_path.display(),
            format = %book.format(),
            sheets = book.sheet_count(),
            "template loaded"
        );
        Ok(book)
    }

    fn loaded(&mut self) -> Result<&mut dyn GridWorkbook, TemplatorError> {
        let book = match self.workbook.take() {
            Some(book) => book,
            None => self.open_template()?,
        };
        let book: &mut dyn GridWorkbook = self.workbook.insert(book).as_mut();
        Ok(book)
    }

    /// Render sheet `sheet_index` (1-based) in place.
    ///
    /// `settings` replaces the stored settings when given; rendering without
    /// any settings is an error.
    pub fn render(
        &mut self,
        settings: Option<Settings>,
        sheet_index: usize,
    ) -> Result<RenderReport, TemplatorError> {
        if let Some(settings) = settings {
            self.set_settings(settings);
        }
        let Some(settings) = self.settings.as_ref() else {
            return Err(TemplatorError::MissingSettings);
        };
        let mut book = match self.workbook.take() {
            Some(book) => book,
            None => self.open_template()?,
        };

        let count = book.sheet_count();
        let outcome = match sheet_index.checked_sub(1).and_then(|i| book.sheet_mut(i)) {
            Some(grid) => {
                #[cfg(feature = "tracing")]
                let _span = tracing::info_span!("render", sheet = sheet_index).entered();
                Ok(SheetRenderer::new(settings, &self.config).render(grid))
            }
            None => Err(TemplatorError::SheetOutOfRange {
                index: sheet_index,
                count,
            }),
        };
        self.workbook = Some(book);
        outcome
    }

    /// Render the first sheet.
    pub fn render_first(
        &mut self,
        settings: Option<Settings>,
    ) -> Result<RenderReport, TemplatorError> {
        self.render(settings, 1)
    }

    fn take_file_name(&mut self, file_name: Option<&str>) -> Result<String, TemplatorError> {
        if let Some(name) = file_name {
            self.output_file_name = Some(name.to_string());
        }
        self.output_file_name
            .clone()
            .ok_or(TemplatorError::MissingOutputFileName)
    }

    /// Write the workbook to the output directory, in the template's format.
    /// Returns the written path.
    pub fn save(&mut self, file_name: Option<&str>) -> Result<PathBuf, TemplatorError> {
        let name = self.take_file_name(file_name)?;
        let path = match &self.output_dir {
            Some(dir) => dir.join(&name),
            None => PathBuf::from(&name),
        };
        self.loaded()?.save_to_path(&path)?;
        #[cfg(feature = "tracing")]
        tracing::info!(path = %path.display(), "workbook saved");
        Ok(path)
    }

    /// Serialize the workbook together with download headers.
    pub fn output(&mut self, file_name: Option<&str>) -> Result<Download, TemplatorError> {
        let name = self.take_file_name(file_name)?;
        let body = self.loaded()?.save_to_bytes()?;
        Ok(Download::new(&name, body))
    }

    /// Hand over the loaded workbook, if any.
    pub fn into_workbook(self) -> Option<Box<dyn GridWorkbook>> {
        self.workbook
    }
}
