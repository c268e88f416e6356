pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prospect Tracker API",
        version = "0.1.0",
        description = "Sales prospects, follow-ups and generated outreach suggestions"
    ),
    paths(
        routes::health_check,
        routes::list_prospects,
        routes::create_prospect,
        routes::get_prospect,
        routes::update_prospect,
        routes::delete_prospect,
        routes::add_interaction,
        routes::list_prospect_follow_ups,
        routes::suggest_message,
        routes::suggest_schedule,
        routes::suggest_tools,
        routes::apply_schedule,
        routes::list_follow_ups,
        routes::create_follow_up,
        routes::list_upcoming_follow_ups,
        routes::get_follow_up,
        routes::update_follow_up,
        routes::delete_follow_up,
        routes::gamification_stats,
        routes::accountability_summary,
        routes::sse::events_stream,
    ),
    components(schemas(
        routes::HealthResponse,
        prospect_core::Prospect,
        prospect_core::FunnelStage,
        prospect_core::ColorCode,
        prospect_core::CreateProspectRequest,
        prospect_core::UpdateProspectRequest,
        prospect_core::Interaction,
        prospect_core::InteractionType,
        prospect_core::CreateInteractionRequest,
        prospect_core::FollowUp,
        prospect_core::FollowUpMethod,
        prospect_core::FollowUpStatus,
        prospect_core::CreateFollowUpRequest,
        prospect_core::UpdateFollowUpRequest,
        prospect_core::GamificationStats,
        prospect_core::AccountabilitySummary,
        ai::Tone,
        ai::MessageSuggestion,
        ai::MessageSuggestionRequest,
        ai::ScheduledFollowUp,
        ai::ScheduleSuggestion,
        ai::ScheduleSuggestionRequest,
        ai::ToolType,
        ai::ToolSuggestion,
        ai::ToolSuggestions,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "prospects", description = "Prospects and their interaction history"),
        (name = "follow-ups", description = "Follow-up scheduling"),
        (name = "suggestions", description = "Generated messages, schedules and sales tools"),
        (name = "stats", description = "Gamification and accountability rollups"),
        (name = "events", description = "Real-time event streaming (SSE)"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route(
            "/api/prospects",
            get(routes::list_prospects).post(routes::create_prospect),
        )
        .route(
            "/api/prospects/{id}",
            get(routes::get_prospect)
                .patch(routes::update_prospect)
                .delete(routes::delete_prospect),
        )
        .route(
            "/api/prospects/{id}/interactions",
            post(routes::add_interaction),
        )
        .route(
            "/api/prospects/{id}/follow-ups",
            get(routes::list_prospect_follow_ups),
        )
        .route(
            "/api/prospects/{id}/suggestions/message",
            post(routes::suggest_message),
        )
        .route(
            "/api/prospects/{id}/suggestions/schedule",
            post(routes::suggest_schedule),
        )
        .route(
            "/api/prospects/{id}/suggestions/tools",
            post(routes::suggest_tools),
        )
        .route(
            "/api/prospects/{id}/schedule/apply",
            post(routes::apply_schedule),
        )
        .route(
            "/api/follow-ups",
            get(routes::list_follow_ups).post(routes::create_follow_up),
        )
        .route(
            "/api/follow-ups/upcoming",
            get(routes::list_upcoming_follow_ups),
        )
        .route(
            "/api/follow-ups/{id}",
            get(routes::get_follow_up)
                .patch(routes::update_follow_up)
                .delete(routes::delete_follow_up),
        )
        .route(
            "/api/stats/gamification",
            get(routes::gamification_stats),
        )
        .route(
            "/api/stats/accountability",
            get(routes::accountability_summary),
        )
        .route("/api/events", get(routes::sse::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
