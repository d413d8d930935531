//! Domain services for LoopEasy.
//!
//! Services contain business logic and the seams to external providers.

pub mod ai_channels;
pub mod payments;
pub mod video_pipeline;

pub use ai_channels::{suggest, AiChannel, ScoredChannel, TimeOfDay, AI_CHANNELS};
pub use payments::{
    CheckoutSession, CheckoutSessionParams, MockPaymentGateway, PaymentGateway,
    PaymentGatewayError,
};
pub use video_pipeline::{DirectUpload, MockVideoPipeline, VideoPipeline, VideoPipelineError};
