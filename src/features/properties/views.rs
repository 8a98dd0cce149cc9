use tracing::warn;
use uuid::Uuid;

use crate::{features::properties::schemas::ViewOut, utilities::errors::AppError};

/// Settles a view-count increment the client already applied locally.
///
/// The stored count wins when the increment went through. On failure the
/// client's optimistic value is echoed back unconfirmed; nothing is rolled back.
pub fn reconcile_views(
    property_id: Uuid,
    optimistic: Option<i64>,
    stored: Result<i64, AppError>,
) -> Result<ViewOut, AppError> {
    match stored {
        Ok(views) => Ok(ViewOut {
            views,
            confirmed: true,
        }),
        Err(AppError::NotFoundError(message)) => Err(AppError::NotFoundError(message)),
        Err(e) => {
            warn!("Failed to record view for property {property_id}: {e}");
            match optimistic {
                Some(views) => Ok(ViewOut {
                    views: views.max(0),
                    confirmed: false,
                }),
                None => Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_count_is_authoritative() {
        let out = reconcile_views(Uuid::nil(), Some(11), Ok(15)).unwrap();
        assert_eq!(out, ViewOut {
            views: 15,
            confirmed: true
        });
    }

    #[test]
    fn failed_write_keeps_optimistic_value() {
        let out = reconcile_views(
            Uuid::nil(),
            Some(11),
            Err(AppError::DatabaseConnectionError),
        )
        .unwrap();
        assert_eq!(out, ViewOut {
            views: 11,
            confirmed: false
        });
    }

    #[test]
    fn failed_write_without_local_value_is_an_error() {
        let result = reconcile_views(Uuid::nil(), None, Err(AppError::DatabaseConnectionError));
        assert!(matches!(result, Err(AppError::DatabaseConnectionError)));
    }

    #[test]
    fn unknown_property_is_not_masked() {
        let result = reconcile_views(
            Uuid::nil(),
            Some(3),
            Err(AppError::NotFoundError("Property not found".into())),
        );
        assert!(matches!(result, Err(AppError::NotFoundError(_))));
    }
}
