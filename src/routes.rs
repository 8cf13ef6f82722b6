// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::Handler,
    http::Method,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{
        admin, auth, authors, comments, contact, interactions, media, profile, site, stories,
    },
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, stories, comments, authors, profile,
///   contact, media, site, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + config).
///
/// Paths that mix a public method with a protected one (e.g. GET vs POST
/// on /api/stories) attach the auth layer per handler; merging two routers
/// that claim the same path would panic at startup.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let story_routes = Router::new()
        .route(
            "/",
            get(stories::list_stories).post(stories::create_story.layer(require_auth.clone())),
        )
        .route("/banners", get(stories::list_banners))
        .route(
            "/{id}",
            get(stories::get_story).delete(stories::delete_story.layer(require_auth.clone())),
        )
        .route(
            "/{id}/comments",
            get(comments::list_story_comments)
                .post(comments::create_comment.layer(require_auth.clone())),
        )
        .route(
            "/{id}/like",
            post(interactions::toggle_story_like.layer(require_auth.clone())),
        )
        .route(
            "/{id}/save",
            post(interactions::toggle_story_save.layer(require_auth.clone())),
        );

    let comment_routes = Router::new()
        .route("/{id}/like", post(comments::toggle_comment_like))
        .route("/{id}", delete(comments::delete_comment))
        .layer(require_auth.clone());

    let author_routes = Router::new()
        .route("/{id}", get(authors::get_author))
        // Protected author routes
        .merge(
            Router::new()
                .route("/{id}/follow", post(interactions::toggle_follow))
                .layer(require_auth.clone()),
        );

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .route("/me/stories", get(profile::list_my_stories))
        .route("/me/saved", get(profile::list_my_saved))
        .layer(require_auth.clone());

    let contact_routes = Router::new()
        .route("/info", get(site::get_contact_info))
        .route("/messages", post(contact::submit_contact_message));

    let media_routes = Router::new()
        .route("/", post(media::upload_media))
        // axum's default body cap (2 MB) sits below the upload limit.
        .layer(DefaultBodyLimit::max(media::MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(require_auth.clone());

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/stories", get(admin::list_stories_for_review))
        .route("/stories/{id}/approval", put(admin::set_story_approval))
        .route("/stories/{id}/banner", put(admin::set_story_banner))
        .route("/team", post(admin::create_team_member))
        .route(
            "/team/{id}",
            put(admin::update_team_member).delete(admin::delete_team_member),
        )
        .route("/contact/info", put(admin::update_contact_info))
        .route("/contact/messages", get(admin::list_contact_messages))
        .route("/contact/messages/{id}/read", put(admin::mark_message_read))
        .route("/ads", post(admin::create_ad_space))
        .route(
            "/ads/{id}",
            put(admin::update_ad_space).delete(admin::delete_ad_space),
        )
        .route("/categories", post(admin::create_category))
        .route(
            "/categories/{id}/subcategories",
            post(admin::create_subcategory),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(require_auth.clone());

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/stories", story_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/authors", author_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/contact", contact_routes)
        .nest("/api/media", media_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/team", get(site::list_team))
        .route("/api/ads", get(site::list_ads))
        .route("/api/tags", get(site::list_tags))
        .route("/api/categories", get(site::list_categories))
        .route("/robots.txt", get(site::robots_txt))
        // Uploaded images are served straight from disk.
        .nest_service("/media", ServeDir::new(&state.config.media_dir))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
