//! API Module
//!
//! Wire types for the Gemini `generateContent` endpoint.

pub mod generate;

pub use generate::{
    ApiError, ApiErrorBody, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    Part,
};
