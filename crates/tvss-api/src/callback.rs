//! Callback-style calling convention.
//!
//! Every async operation also accepts a completion handler. The handler
//! receives exactly one `Result`, so an error and a value are never delivered
//! together.
#![allow(clippy::future_not_send)]

use std::future::Future;

use serde_json::Value;

use crate::error::ApiError;
use crate::tvss::{Document, LocalTvssApi};

/// Awaits `operation` and hands its outcome to `callback`.
pub async fn deliver<T, F, R>(operation: impl Future<Output = Result<T, ApiError>>, callback: F) -> R
where
    F: FnOnce(Result<T, ApiError>) -> R,
{
    callback(operation.await)
}

/// Completion-handler variants of every [`LocalTvssApi`] method.
///
/// Implemented for all API implementations; each method awaits the
/// corresponding async method and passes the outcome to `callback`.
#[allow(clippy::module_name_repetitions)]
pub trait TvssApiCallbackExt: LocalTvssApi {
    /// Callback-style [`LocalTvssApi::day_schedule`].
    fn day_schedule_with_callback<F, R>(
        &self,
        callsign: &str,
        datestring: Option<&str>,
        callback: F,
    ) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Document, ApiError>) -> R,
    {
        deliver(self.day_schedule(callsign, datestring), callback)
    }

    /// Callback-style [`LocalTvssApi::upcoming_by_program_id`].
    fn upcoming_by_program_id_with_callback<F, R>(
        &self,
        callsign: &str,
        program_id: &str,
        callback: F,
    ) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Document, ApiError>) -> R,
    {
        deliver(self.upcoming_by_program_id(callsign, program_id), callback)
    }

    /// Callback-style [`LocalTvssApi::upcoming_by_show_id`].
    fn upcoming_by_show_id_with_callback<F, R>(
        &self,
        callsign: &str,
        show_id: &str,
        callback: F,
    ) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Document, ApiError>) -> R,
    {
        deliver(self.upcoming_by_show_id(callsign, show_id), callback)
    }

    /// Callback-style [`LocalTvssApi::callsigns_by_zip`].
    fn callsigns_by_zip_with_callback<F, R>(
        &self,
        zip: &str,
        min_confidence: Option<u32>,
        callback: F,
    ) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Vec<String>, ApiError>) -> R,
    {
        deliver(self.callsigns_by_zip(zip, min_confidence), callback)
    }

    /// Callback-style [`LocalTvssApi::programs`].
    fn programs_with_callback<F, R>(&self, callback: F) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Value, ApiError>) -> R,
    {
        deliver(self.programs(), callback)
    }

    /// Callback-style [`LocalTvssApi::zip_from_ip`].
    fn zip_from_ip_with_callback<F, R>(&self, ip_address: &str, callback: F) -> impl Future<Output = R>
    where
        F: FnOnce(Result<Value, ApiError>) -> R,
    {
        deliver(self.zip_from_ip(ip_address), callback)
    }
}

impl<T: LocalTvssApi + ?Sized> TvssApiCallbackExt for T {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::ResponseStatus;
    use crate::tvss::TvssApi;

    /// In-memory API returning canned outcomes.
    #[derive(Debug, Default)]
    struct StubApi {
        calls: Mutex<Vec<String>>,
        fail_with_status: Option<u16>,
    }

    impl StubApi {
        fn failing(status: u16) -> Self {
            Self {
                fail_with_status: Some(status),
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with_status {
                Some(code) => Err(ApiError::HttpStatus {
                    status: ResponseStatus::Code(code),
                }),
                None => Ok(()),
            }
        }
    }

    impl TvssApi for StubApi {
        async fn day_schedule(
            &self,
            callsign: &str,
            datestring: Option<&str>,
        ) -> Result<Document, ApiError> {
            self.record(format!("day:{callsign}:{datestring:?}"))?;
            let mut doc = Document::new();
            doc.insert(String::from("callsign"), json!(callsign.to_lowercase()));
            Ok(doc)
        }

        async fn upcoming_by_program_id(
            &self,
            callsign: &str,
            program_id: &str,
        ) -> Result<Document, ApiError> {
            self.record(format!("program:{callsign}:{program_id}"))?;
            Ok(Document::new())
        }

        async fn upcoming_by_show_id(
            &self,
            callsign: &str,
            show_id: &str,
        ) -> Result<Document, ApiError> {
            self.record(format!("show:{callsign}:{show_id}"))?;
            Ok(Document::new())
        }

        async fn callsigns_by_zip(
            &self,
            zip: &str,
            min_confidence: Option<u32>,
        ) -> Result<Vec<String>, ApiError> {
            self.record(format!("zip:{zip}:{min_confidence:?}"))?;
            Ok(vec![String::from("KQED"), String::from("KQEH")])
        }

        async fn programs(&self) -> Result<Value, ApiError> {
            self.record(String::from("programs"))?;
            Ok(json!({"programs": []}))
        }

        async fn zip_from_ip(&self, ip_address: &str) -> Result<Value, ApiError> {
            self.record(format!("ip:{ip_address}"))?;
            Ok(json!({"$items": [{"zipcode": "94110"}]}))
        }
    }

    #[tokio::test]
    async fn test_deliver_passes_success() {
        // Arrange
        let operation = async { Ok::<_, ApiError>(42) };

        // Act
        let delivered = deliver(operation, |result| result.unwrap()).await;

        // Assert
        assert_eq!(delivered, 42);
    }

    #[tokio::test]
    async fn test_deliver_passes_error() {
        // Arrange
        let operation = async {
            Err::<u32, _>(ApiError::EmptyResult {
                endpoint: "day_schedule",
            })
        };

        // Act
        let delivered = deliver(operation, |result| result.err().map(|e| e.to_string())).await;

        // Assert
        assert!(delivered.unwrap().contains("day_schedule"));
    }

    #[tokio::test]
    async fn test_callback_variants_forward_arguments() {
        // Arrange
        let api = StubApi::default();

        // Act
        let schedule = api
            .day_schedule_with_callback("KQED", Some("20240101"), Result::unwrap)
            .await;
        api.upcoming_by_program_id_with_callback("kqed", "3190", Result::unwrap)
            .await;
        api.upcoming_by_show_id_with_callback("kqed", "episode_44926", Result::unwrap)
            .await;
        let callsigns = api
            .callsigns_by_zip_with_callback("94110", Some(50), Result::unwrap)
            .await;
        api.programs_with_callback(Result::unwrap).await;
        api.zip_from_ip_with_callback("8.8.8.8", Result::unwrap)
            .await;

        // Assert
        assert_eq!(schedule["callsign"], "kqed");
        assert_eq!(callsigns, vec!["KQED", "KQEH"]);
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![
                "day:KQED:Some(\"20240101\")",
                "program:kqed:3190",
                "show:kqed:episode_44926",
                "zip:94110:Some(50)",
                "programs",
                "ip:8.8.8.8",
            ]
        );
    }

    #[tokio::test]
    async fn test_callback_matches_async_outcome_on_failure() {
        // Arrange
        let api = StubApi::failing(404);

        // Act
        let direct = LocalTvssApi::programs(&api).await;
        let via_callback = api.programs_with_callback(|result| result).await;

        // Assert
        assert_eq!(direct.unwrap_err().status_code(), Some(404));
        assert_eq!(via_callback.unwrap_err().status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_callback_runs_exactly_once() {
        // Arrange
        let api = StubApi::default();
        let mut invocations = 0_u32;

        // Act
        api.zip_from_ip_with_callback("8.8.8.8", |result| {
            assert!(result.is_ok());
            invocations = invocations.saturating_add(1);
        })
        .await;

        // Assert
        assert_eq!(invocations, 1);
    }
}
