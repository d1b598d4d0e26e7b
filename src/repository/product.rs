use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, NewProductImage, Product as DbProduct,
        ProductImage as DbProductImage, UpdateProduct as DbUpdateProduct,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        if let Some(db_product) = product {
            let mut domain: DomainProduct = db_product.into();
            let mut images = load_images_for_products(&mut conn, &[domain.id])?;
            domain.images = images.remove(&domain.id).unwrap_or_default();
            Ok(Some(domain))
        } else {
            Ok(None)
        }
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut count_query = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            count_query = count_query.filter(products::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                products::title
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            items = items.filter(products::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                products::title
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        items = items.order((products::is_deleted.asc(), products::created_at.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut image_map = load_images_for_products(&mut conn, &product_ids)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.images = image_map.remove(&domain.id).unwrap_or_default();
            domain_products.push(domain);
        }

        Ok((total, domain_products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn set_product_images(
        &self,
        product_id: i32,
        thumbnail: &str,
        images: &[String],
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            diesel::delete(product_images::table.filter(product_images::product_id.eq(product_id)))
                .execute(conn)?;

            let rows: Vec<NewProductImage> = images
                .iter()
                .enumerate()
                .map(|(position, url)| NewProductImage {
                    product_id,
                    url: url.as_str(),
                    position: position as i32,
                })
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(product_images::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            let now = chrono::Local::now().naive_utc();
            let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                .set((
                    products::thumbnail.eq(thumbnail),
                    products::updated_at.eq(now),
                ))
                .get_result::<DbProduct>(conn)?;

            let mut domain: DomainProduct = updated.into();
            let mut image_map = load_images_for_products(conn, &[domain.id])?;
            domain.images = image_map.remove(&domain.id).unwrap_or_default();

            Ok(domain)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let target = products::table.filter(products::id.eq(product_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        let mut domain: DomainProduct = updated.into();
        let mut image_map = load_images_for_products(&mut conn, &[domain.id])?;
        domain.images = image_map.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn set_product_deleted(&self, product_id: i32, is_deleted: bool) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        let target = products::table.filter(products::id.eq(product_id));

        let updated = diesel::update(target)
            .set((
                products::is_deleted.eq(is_deleted),
                products::updated_at.eq(now),
            ))
            .get_result::<DbProduct>(&mut conn)?;

        let mut domain: DomainProduct = updated.into();
        let mut image_map = load_images_for_products(&mut conn, &[domain.id])?;
        domain.images = image_map.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn purge_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(product_images::table.filter(product_images::product_id.eq(product_id)))
                .execute(conn)?;

            let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn load_images_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<String>>> {
    use crate::schema::product_images;

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_images::table
        .filter(product_images::product_id.eq_any(product_ids))
        .order(product_images::position.asc())
        .load::<DbProductImage>(conn)?;

    let mut map: HashMap<i32, Vec<String>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.url);
    }

    Ok(map)
}
