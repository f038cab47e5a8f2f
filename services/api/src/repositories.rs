//! Repositories for database operations

pub mod cart;
pub mod favorite;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

pub use cart::CartRepository;
pub use favorite::FavoriteRepository;
pub use ingredient::IngredientRepository;
pub use recipe::RecipeRepository;
pub use subscription::SubscriptionRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
