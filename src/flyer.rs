use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{FlyerError, Result, Stage};
use crate::labels::LookupTable;
use crate::layout::LayoutConfig;
use crate::normalize::normalize;
use crate::planner::{plan, sanitize_slug, FlyerPlan};
use crate::qr::QrEncoder;
use crate::render::PageRenderer;
use crate::source::ListingSource;
use crate::transient::TransientFile;

#[derive(Debug, Clone)]
pub struct FlyerRequest {
    pub slug: String,
    pub output_dir: PathBuf,
    /// Stop after planning; nothing is written.
    pub dry_run: bool,
}

/// External services used by one flyer generation. The caller owns them.
pub struct Collaborators<'a> {
    pub source: &'a dyn ListingSource,
    pub qr: &'a dyn QrEncoder,
    pub renderer: &'a dyn PageRenderer,
}

#[derive(Debug, Clone)]
pub struct FlyerOutput {
    pub pdf_path: Option<PathBuf>,
    pub plan: FlyerPlan,
}

pub fn pdf_file_name(slug: &str) -> String {
    format!("{}.pdf", sanitize_slug(slug))
}

pub fn generate(
    request: &FlyerRequest,
    config: &LayoutConfig,
    table: &LookupTable,
    collaborators: &Collaborators<'_>,
) -> Result<FlyerOutput> {
    let slug = request.slug.trim();
    info!("flyer: fetching listing {}", slug);
    let record = collaborators
        .source
        .fetch_listing(slug)
        .map_err(|err| FlyerError::collaborator(Stage::DataSource, err))?
        .ok_or_else(|| FlyerError::NotFound {
            slug: slug.to_string(),
        })?;

    let normalized = normalize(&record, table);
    debug!(
        "flyer: {} characteristic line(s), generation {:?}",
        normalized.characteristics.len(),
        normalized.generation_name
    );
    let plan = plan(&normalized, config, table)?;
    if request.dry_run {
        return Ok(FlyerOutput {
            pdf_path: None,
            plan,
        });
    }

    create_dir(&request.output_dir)?;
    if let Some(parent) = plan.qr_path.parent() {
        create_dir(parent)?;
    }

    let qr_file = TransientFile::new(&plan.qr_path);
    info!("flyer: encoding {}", plan.qr_url);
    collaborators
        .qr
        .encode(&plan.qr_url, qr_file.path())
        .map_err(|err| FlyerError::collaborator(Stage::QrEncoding, err))?;

    let pdf_path = request.output_dir.join(pdf_file_name(slug));
    info!("flyer: rendering {}", pdf_path.display());
    if let Err(err) = collaborators
        .renderer
        .render(&plan.instructions, &plan.page, &pdf_path)
    {
        if fs::remove_file(&pdf_path).is_ok() {
            debug!("flyer: removed partial {}", pdf_path.display());
        }
        return Err(FlyerError::collaborator(Stage::Rendering, err));
    }
    drop(qr_file);

    Ok(FlyerOutput {
        pdf_path: Some(pdf_path),
        plan,
    })
}

fn create_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|err| {
        FlyerError::collaborator(
            Stage::Filesystem,
            anyhow::Error::new(err).context(format!("failed to create {}", dir.display())),
        )
    })
}
