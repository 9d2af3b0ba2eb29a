// Presentation layer - card and editor facades driven by the host
pub mod card;
pub mod editor;
