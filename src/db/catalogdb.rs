// db/catalogdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::catalogmodel::{Category, SubCategory};

#[async_trait]
pub trait CatalogExt {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error>;

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>, sqlx::Error>;

    async fn save_category(
        &self,
        category_name: &str,
        image: Option<&str>,
    ) -> Result<Category, sqlx::Error>;

    async fn update_category(
        &self,
        category_id: Uuid,
        category_name: Option<&str>,
        image: Option<&str>,
    ) -> Result<Category, sqlx::Error>;

    async fn delete_category(&self, category_id: Uuid) -> Result<(), sqlx::Error>;

    async fn get_services(&self, category_id: Option<Uuid>) -> Result<Vec<SubCategory>, sqlx::Error>;

    async fn get_service(&self, service_id: Uuid) -> Result<Option<SubCategory>, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_service(
        &self,
        category_id: Uuid,
        name: &str,
        description: &str,
        cover_image: Option<&str>,
        image: Option<&str>,
        section: &str,
        steps: &str,
        faqs: &str,
        price: f64,
    ) -> Result<SubCategory, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn update_service(
        &self,
        service_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        cover_image: Option<&str>,
        image: Option<&str>,
        section: Option<&str>,
        steps: Option<&str>,
        faqs: Option<&str>,
        price: Option<f64>,
    ) -> Result<SubCategory, sqlx::Error>;

    async fn delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl CatalogExt for DBClient {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name, image, created_at, updated_at
            FROM categories
            ORDER BY category_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name, image, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_category(
        &self,
        category_name: &str,
        image: Option<&str>,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_name, image)
            VALUES ($1, $2)
            RETURNING id, category_name, image, created_at, updated_at
            "#,
        )
        .bind(category_name)
        .bind(image)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_category(
        &self,
        category_id: Uuid,
        category_name: Option<&str>,
        image: Option<&str>,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET category_name = COALESCE($2, category_name),
                image = COALESCE($3, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, category_name, image, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(category_name)
        .bind(image)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_category(&self, category_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_services(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<SubCategory>, sqlx::Error> {
        match category_id {
            Some(category_id) => {
                sqlx::query_as::<_, SubCategory>(
                    r#"
                    SELECT id, category_id, name, description, cover_image, image,
                           section, steps, faqs, price, created_at, updated_at
                    FROM subcategories
                    WHERE category_id = $1
                    ORDER BY name ASC
                    "#,
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, SubCategory>(
                    r#"
                    SELECT id, category_id, name, description, cover_image, image,
                           section, steps, faqs, price, created_at, updated_at
                    FROM subcategories
                    ORDER BY name ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<SubCategory>, sqlx::Error> {
        sqlx::query_as::<_, SubCategory>(
            r#"
            SELECT id, category_id, name, description, cover_image, image,
                   section, steps, faqs, price, created_at, updated_at
            FROM subcategories
            WHERE id = $1
            "#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_service(
        &self,
        category_id: Uuid,
        name: &str,
        description: &str,
        cover_image: Option<&str>,
        image: Option<&str>,
        section: &str,
        steps: &str,
        faqs: &str,
        price: f64,
    ) -> Result<SubCategory, sqlx::Error> {
        sqlx::query_as::<_, SubCategory>(
            r#"
            INSERT INTO subcategories (
                category_id, name, description, cover_image, image, section, steps, faqs, price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, category_id, name, description, cover_image, image,
                      section, steps, faqs, price, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(cover_image)
        .bind(image)
        .bind(section)
        .bind(steps)
        .bind(faqs)
        .bind(price)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        cover_image: Option<&str>,
        image: Option<&str>,
        section: Option<&str>,
        steps: Option<&str>,
        faqs: Option<&str>,
        price: Option<f64>,
    ) -> Result<SubCategory, sqlx::Error> {
        sqlx::query_as::<_, SubCategory>(
            r#"
            UPDATE subcategories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                cover_image = COALESCE($4, cover_image),
                image = COALESCE($5, image),
                section = COALESCE($6, section),
                steps = COALESCE($7, steps),
                faqs = COALESCE($8, faqs),
                price = COALESCE($9, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, category_id, name, description, cover_image, image,
                      section, steps, faqs, price, created_at, updated_at
            "#,
        )
        .bind(service_id)
        .bind(name)
        .bind(description)
        .bind(cover_image)
        .bind(image)
        .bind(section)
        .bind(steps)
        .bind(faqs)
        .bind(price)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
