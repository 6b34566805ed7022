//! `ObjectStorage` backed by an S3 (or S3-compatible) bucket.

use crate::{
    config::AppConfig,
    services::object_storage::{
        ObjectStorage, StorageError, StorageResult, StoredObject, WriteCondition,
    },
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    Client,
    config::http::HttpResponse,
    error::SdkError,
    operation::get_object::GetObjectError,
    presigning::PresigningConfig,
    primitives::ByteStream,
};
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Build a client from the ambient AWS credential chain.
    ///
    /// A configured endpoint URL switches to path-style addressing, which
    /// MinIO and most other S3-compatible servers require.
    pub async fn connect(cfg: &AppConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(cfg.region.clone()));
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared)
                .force_path_style(cfg.endpoint_url.is_some())
                .build(),
        );

        Self {
            client,
            bucket: cfg.bucket.clone(),
        }
    }
}

/// HTTP status of the raw response behind an SDK error, when there was one.
fn raw_status<E>(err: &SdkError<E, HttpResponse>) -> Option<u16> {
    err.raw_response().map(|resp| resp.status().as_u16())
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let not_found = raw_status(&err) == Some(404)
                    || matches!(err.as_service_error(), Some(GetObjectError::NoSuchKey(_)));
                return Err(if not_found {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::backend(err)
                });
            }
        };

        let etag = output.e_tag().map(str::to_owned);
        let body = output
            .body
            .collect()
            .await
            .map_err(StorageError::backend)?
            .into_bytes();
        debug!(key, bytes = body.len(), "fetched object");

        Ok(StoredObject { body, etag })
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        condition: WriteCondition,
    ) -> StorageResult<()> {
        let size = body.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body));

        request = match condition {
            WriteCondition::Overwrite => request,
            WriteCondition::IfMatch(etag) => request.if_match(etag),
            WriteCondition::IfAbsent => request.if_none_match("*"),
        };

        match request.send().await {
            Ok(_) => {
                debug!(key, bytes = size, "stored object");
                Ok(())
            }
            // 412 is a failed precondition; 409 is a conditional write racing another one.
            Err(err) if matches!(raw_status(&err), Some(412) | Some(409)) => {
                Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                })
            }
            Err(err) => Err(StorageError::backend(err)),
        }
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        let presign = PresigningConfig::expires_in(ttl).map_err(StorageError::backend)?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign)
            .await
            .map_err(StorageError::backend)?;

        Ok(request.uri().to_string())
    }
}
