//! Image metadata, binaries and descriptions.

use bytes::Bytes;
use thorns_core::model::{Image, ImageContents, ImageDescription};
use thorns_core::{CacheDomain, Error, ImageKey};

use super::ThornsClient;
use super::response::{DescriptionResponse, ImagesResponse};
use crate::endpoint::{Arguments, Endpoint, HttpRequest};

impl ThornsClient {
    /// Metadata of one image, or of the origin's default image when `name`
    /// is `None`.
    ///
    /// A default-image fetch is also stored under the image's own name.
    pub async fn single_image(&self, name: Option<&str>) -> Result<Image, Error> {
        let key = ImageKey::from(name);
        let now = self.clock.now();
        if let Some(image) = self.cache.read(|state| state.images.fresh(&key, now).cloned()) {
            tracing::debug!(image = %key, "image cache hit");
            return Ok(image);
        }

        let image: Image = self.call(Endpoint::SingleImage, Arguments::new().with_opt("name", name)).await?;
        let image = image.resolve_urls(&self.origin);
        let cached_at = self.clock.now();
        self.cache.update(|state| {
            if key.is_default() {
                state.images.put(ImageKey::named(&image.name), image.clone(), cached_at);
            }
            state.images.put(key, image.clone(), cached_at);
        });
        self.cache.persist(CacheDomain::Images).await?;

        Ok(image)
    }

    /// Full image and thumbnail payloads.
    pub async fn image_contents(&self, name: Option<&str>) -> Result<ImageContents, Error> {
        let key = ImageKey::from(name);
        let now = self.clock.now();
        if let Some(contents) = self.cache.read(|state| state.image_contents.fresh(&key, now).cloned()) {
            tracing::debug!(image = %key, "image contents cache hit");
            return Ok(contents);
        }

        let image = self.single_image(name).await?;
        let full = self.fetch_binary(&image.image_url).await?;
        let thumbnail = self.fetch_binary(&image.thumb_url).await?;
        let contents = ImageContents { image: full, thumbnail };

        let cached_at = self.clock.now();
        self.cache.update(|state| state.image_contents.put(key, contents.clone(), cached_at));
        self.cache.persist(CacheDomain::ImageContents).await?;

        Ok(contents)
    }

    /// Metadata and payloads of one image together.
    pub async fn image_with_contents(&self, name: Option<&str>) -> Result<(Image, ImageContents), Error> {
        let contents = self.image_contents(name).await?;
        let image = self.single_image(name).await?;
        Ok((image, contents))
    }

    /// Description of an image, titled after the image.
    pub async fn image_description(&self, name: &str) -> Result<ImageDescription, Error> {
        let now = self.clock.now();
        if let Some(description) = self.cache.read(|state| state.image_descriptions.fresh(name, now).cloned()) {
            tracing::debug!(image = name, "image description cache hit");
            return Ok(description);
        }

        let response: DescriptionResponse =
            self.call(Endpoint::ImageDescription, Arguments::new().with("name", name)).await?;
        let title = self.single_image(Some(name)).await?.title;
        let description = ImageDescription { title, description: response.description };

        let cached_at = self.clock.now();
        self.cache.update(|state| state.image_descriptions.put(name.to_string(), description.clone(), cached_at));
        self.cache.persist(CacheDomain::ImageDescriptions).await?;

        Ok(description)
    }

    /// Every image, in the order the origin lists them.
    ///
    /// Refreshing replaces the whole images domain and aliases the first
    /// image under the default key.
    pub async fn all_images(&self) -> Result<Vec<Image>, Error> {
        let now = self.clock.now();
        let cached = self.cache.read(|state| {
            state.metadata.all_images_fresh(now).then(|| {
                state
                    .images
                    .iter()
                    .filter(|(key, _)| !key.is_default())
                    .map(|(_, entry)| entry.value.clone())
                    .collect::<Vec<_>>()
            })
        });
        if let Some(images) = cached {
            tracing::debug!(count = images.len(), "all images cache hit");
            return Ok(images);
        }

        let response: ImagesResponse = self.call(Endpoint::AllImages, Arguments::new()).await?;
        let images: Vec<Image> = response.images.into_iter().map(|image| image.resolve_urls(&self.origin)).collect();

        let cached_at = self.clock.now();
        self.cache.update(|state| -> Result<(), Error> {
            state.purge(CacheDomain::Images, true, cached_at)?;
            for image in &images {
                state.images.put(ImageKey::named(&image.name), image.clone(), cached_at);
            }
            if let Some(first) = images.first() {
                state.images.put(ImageKey::Default, first.clone(), cached_at);
            }
            state.metadata.last_all_images = Some(cached_at);
            Ok(())
        })?;
        tracing::info!(count = images.len(), "images domain repopulated");
        self.cache.persist(CacheDomain::Images).await?;

        Ok(images)
    }

    async fn fetch_binary(&self, url: &str) -> Result<Bytes, Error> {
        self.transport.get(&HttpRequest::get(url)).await
    }
}
