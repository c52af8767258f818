use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    #[validate(length(min = 2, max = 100, message = "Category name must be between 2-100 characters"))]
    pub category_name: String,

    pub image: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 2, max = 100, message = "Category name must be between 2-100 characters"))]
    pub category_name: Option<String>,

    pub image: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServiceDto {
    pub category_id: Uuid,

    #[validate(length(min = 2, max = 150, message = "Service name must be between 2-150 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub cover_image: Option<String>,
    pub image: Option<String>,

    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub faqs: String,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateServiceDto {
    #[validate(length(min = 2, max = 150, message = "Service name must be between 2-150 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,

    pub cover_image: Option<String>,
    pub image: Option<String>,
    pub section: Option<String>,
    pub steps: Option<String>,
    pub faqs: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceQueryDto {
    pub category_id: Option<Uuid>,
}
