mod core;

pub use self::core::{
    ContentPart, GenerationChunk, GenerationInput, GenerationOutput, GenerationParams,
    GenerationRequest, Message, ResponseUnit, Role, generation_stream,
};
