//! Browse Catalog Use Case
//!
//! Public read surface over courses and test series. Only active items
//! are visible here.

use std::sync::Arc;

use kernel::id::{CourseId, TestSeriesId};

use crate::domain::entities::{Course, TestSeries};
use crate::domain::repository::CatalogRepository;
use crate::domain::value_objects::Pagination;
use crate::error::{CommerceError, CommerceResult};

/// Browse catalog use case
pub struct BrowseCatalogUseCase<C>
where
    C: CatalogRepository,
{
    catalog: Arc<C>,
}

impl<C> BrowseCatalogUseCase<C>
where
    C: CatalogRepository,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub async fn list_courses(&self, page: Pagination) -> CommerceResult<Vec<Course>> {
        self.catalog.list_courses(page).await
    }

    pub async fn get_course(&self, course_id: CourseId) -> CommerceResult<Course> {
        self.catalog
            .find_course(course_id)
            .await?
            .ok_or(CommerceError::ItemNotFound)
    }

    pub async fn list_test_series(&self, page: Pagination) -> CommerceResult<Vec<TestSeries>> {
        self.catalog.list_test_series(page).await
    }

    pub async fn get_test_series(&self, series_id: TestSeriesId) -> CommerceResult<TestSeries> {
        self.catalog
            .find_test_series(series_id)
            .await?
            .ok_or(CommerceError::ItemNotFound)
    }
}
