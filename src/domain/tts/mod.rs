pub mod dto;
pub mod encoding;
pub mod voice;

pub use dto::{SynthesisRequest, SynthesisResult};
pub use encoding::AudioEncoding;
pub use voice::{SsmlGender, Voice};
