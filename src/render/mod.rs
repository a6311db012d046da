pub(crate) mod blend;
pub(crate) mod compositor;
pub(crate) mod content;
pub(crate) mod effects;
pub(crate) mod layers;
pub(crate) mod output;
