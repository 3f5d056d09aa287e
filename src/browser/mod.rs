pub mod session;

pub use session::RenderSession;
