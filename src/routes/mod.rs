pub mod guild_routes;
pub mod static_routes;
