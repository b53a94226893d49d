use crate::keys::validate_key;
use crate::traits::{ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, GetOptions, ObjectStore, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::collections::BTreeMap;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional base for public URLs (CDN or custom domain)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
        })
    }

    fn attributes(content_type: &str, metadata: &BTreeMap<String, String>) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        for (key, value) in metadata {
            attributes.insert(
                Attribute::Metadata(key.clone().into()),
                AttributeValue::from(value.clone()),
            );
        }
        attributes
    }
}

/// Public URL for an object.
///
/// A configured public base wins; S3-compatible endpoints use path-style
/// `{endpoint}/{bucket}/{key}`; plain AWS uses `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
fn object_url(
    public_base_url: Option<&str>,
    endpoint_url: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    if let Some(base) = public_base_url {
        format!("{}/{}", base.trim_end_matches('/'), key)
    } else if let Some(endpoint) = endpoint_url {
        format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
    } else {
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let opts = PutOptions {
            attributes: Self::attributes(content_type, metadata),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.public_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        match self.metadata(storage_key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        let opts = GetOptions {
            head: true,
            ..Default::default()
        };

        let result = self
            .store
            .get_opts(&location, opts)
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => {
                    StorageError::NotFound(storage_key.to_string())
                }
                other => StorageError::BackendError(other.to_string()),
            })?;

        let mut content_type = None;
        let mut metadata = BTreeMap::new();
        for (attribute, value) in result.attributes.iter() {
            match attribute {
                Attribute::ContentType => content_type = Some(value.to_string()),
                Attribute::Metadata(key) => {
                    metadata.insert(key.to_string(), value.to_string());
                }
                _ => {}
            }
        }

        Ok(ObjectInfo {
            key: storage_key.to_string(),
            size: result.meta.size,
            content_type,
            metadata,
        })
    }

    fn public_url(&self, storage_key: &str) -> String {
        object_url(
            self.public_base_url.as_deref(),
            self.endpoint_url.as_deref(),
            &self.bucket,
            &self.region,
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
