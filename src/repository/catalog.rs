use diesel::prelude::*;

use crate::{
    domain::brand::Brand as DomainBrand,
    domain::category::Category as DomainCategory,
    models::brand::Brand as DbBrand,
    models::category::Category as DbCategory,
    repository::errors::RepositoryResult,
    repository::{BrandReader, CategoryReader, DieselRepository},
};

impl BrandReader for DieselRepository {
    fn get_brand_by_id(&self, id: i32) -> RepositoryResult<Option<DomainBrand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;
        let brand = brands::table
            .filter(brands::id.eq(id))
            .first::<DbBrand>(&mut conn)
            .optional()?;

        Ok(brand.map(Into::into))
    }

    fn list_brands(&self) -> RepositoryResult<Vec<DomainBrand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;
        let rows = brands::table
            .order(brands::name.asc())
            .load::<DbBrand>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .filter(categories::id.eq(id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let rows = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
