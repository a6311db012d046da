use crate::{
    assets::bitmap::Bitmap,
    assets::loader::ImageLoader,
    foundation::core::PlacementSettings,
    foundation::error::{IngotError, IngotResult},
    render::compositor::EngravingCompositor,
    render::output::RenderResult,
    request::EngravingRequest,
};

/// Decoded inputs of one request.
#[derive(Clone, Debug)]
pub struct LoadedInputs {
    /// Product surface image.
    pub base: Bitmap,
    /// Logo, when the request resolves to the logo path.
    pub logo: Option<Bitmap>,
}

/// Load the base image and (if needed) the logo concurrently.
///
/// A base failure is reported before a logo failure. Text requests never load the logo.
#[tracing::instrument(skip_all, fields(base = %request.base_image.describe()))]
pub async fn load_inputs(
    loader: &ImageLoader,
    request: &EngravingRequest,
) -> IngotResult<LoadedInputs> {
    let (base, logo) = loader
        .load_pair(&request.base_image, request.logo_to_load())
        .await;
    let base = base?;
    let logo = logo.transpose()?;
    tracing::debug!(has_logo = logo.is_some(), "inputs loaded");
    Ok(LoadedInputs { base, logo })
}

/// Load inputs, then composite.
///
/// A load failure is returned as-is and the compositor is not invoked.
pub async fn render_engraving(
    loader: &ImageLoader,
    compositor: &mut EngravingCompositor,
    request: &EngravingRequest,
) -> IngotResult<RenderResult> {
    let inputs = load_inputs(loader, request).await?;
    compositor.render(request, &inputs.base, inputs.logo.as_ref())
}

/// Terminal failure of a render attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderFailure {
    /// Display message.
    pub message: String,
    /// Whether [`RenderSession::retry`] may help.
    pub retryable: bool,
}

impl From<&IngotError> for RenderFailure {
    fn from(e: &IngotError) -> Self {
        Self {
            message: e.to_string(),
            retryable: e.is_retryable(),
        }
    }
}

/// Where a [`RenderSession`] is.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RenderState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Images are being fetched. A session left here had its render future dropped.
    Loading,
    /// Images decoded, compositing pending.
    Loaded,
    /// A result is available.
    Composited(RenderResult),
    /// The last attempt failed.
    Error(RenderFailure),
}

/// Drives the load and composite cycle for one preview, keeping loaded bitmaps so placement
/// adjustments only re-composite.
pub struct RenderSession {
    loader: ImageLoader,
    compositor: EngravingCompositor,
    request: Option<EngravingRequest>,
    inputs: Option<LoadedInputs>,
    state: RenderState,
}

impl RenderSession {
    /// Idle session.
    pub fn new(loader: ImageLoader, compositor: EngravingCompositor) -> Self {
        Self {
            loader,
            compositor,
            request: None,
            inputs: None,
            state: RenderState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Latest successful result, if the session is composited.
    pub fn result(&self) -> Option<&RenderResult> {
        match &self.state {
            RenderState::Composited(r) => Some(r),
            _ => None,
        }
    }

    /// Request the session is working on.
    pub fn request(&self) -> Option<&EngravingRequest> {
        self.request.as_ref()
    }

    /// Start a fresh render: load, then composite.
    pub async fn render(&mut self, request: EngravingRequest) -> IngotResult<RenderResult> {
        self.request = Some(request);
        self.inputs = None;
        self.run().await
    }

    /// Re-run the current request from scratch.
    pub async fn retry(&mut self) -> IngotResult<RenderResult> {
        if self.request.is_none() {
            return Err(IngotError::validation("nothing to retry"));
        }
        self.inputs = None;
        self.run().await
    }

    /// Re-composite with new placement using the already loaded images.
    pub fn adjust(&mut self, placement: PlacementSettings) -> IngotResult<RenderResult> {
        let bounds = self.compositor.config().placement_bounds;
        let Some(request) = self.request.as_mut() else {
            return Err(IngotError::validation("adjust needs a previous render"));
        };
        if self.inputs.is_none() {
            return Err(IngotError::validation("adjust needs loaded images"));
        }
        request.placement = placement.normalized(&bounds);
        self.composite()
    }

    async fn run(&mut self) -> IngotResult<RenderResult> {
        let Some(request) = self.request.as_ref() else {
            return Err(IngotError::validation("no request"));
        };
        self.state = RenderState::Loading;
        match load_inputs(&self.loader, request).await {
            Ok(inputs) => {
                self.inputs = Some(inputs);
                self.state = RenderState::Loaded;
            }
            Err(e) => {
                tracing::warn!(error = %e, "render inputs failed to load");
                self.state = RenderState::Error(RenderFailure::from(&e));
                return Err(e);
            }
        }
        self.composite()
    }

    fn composite(&mut self) -> IngotResult<RenderResult> {
        let (Some(request), Some(inputs)) = (self.request.as_ref(), self.inputs.as_ref()) else {
            return Err(IngotError::validation("composite needs a request and loaded images"));
        };
        match self
            .compositor
            .render(request, &inputs.base, inputs.logo.as_ref())
        {
            Ok(result) => {
                self.state = RenderState::Composited(result.clone());
                Ok(result)
            }
            Err(e) => {
                self.state = RenderState::Error(RenderFailure::from(&e));
                Err(e)
            }
        }
    }
}
