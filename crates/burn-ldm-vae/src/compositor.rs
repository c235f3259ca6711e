//! Mask compositing for inpainting
//!
//! Masks are `[0, 1]` weights on the original image: 1 keeps the original
//! pixel, 0 keeps the generated one.

use burn::prelude::*;

use crate::codec::CodecError;

/// Blend two images through a mask
///
/// `original * mask + decoded * (1 - mask)`. A single-channel mask is
/// repeated across the image channels and a batch of one is repeated across
/// the decoded batch.
pub fn blend<B: Backend>(
    original: Tensor<B, 4>,
    decoded: Tensor<B, 4>,
    mask: Tensor<B, 4>,
) -> Result<Tensor<B, 4>, CodecError> {
    let dims = decoded.dims();
    let original = broadcast_to(original, dims, "original image")?;
    let mask = broadcast_to(mask, dims, "mask")?;

    let inverse = mask.clone().neg().add_scalar(1.0);
    Ok(original * mask + decoded * inverse)
}

/// Derive a mask from a decoded image in `[0, 1]`
///
/// `clamp((x - 0.25) / 0.5, 0, 1)`: dark regions are regenerated, bright
/// regions keep the original.
pub fn auto_mask<B: Backend>(decoded: Tensor<B, 4>) -> Tensor<B, 4> {
    decoded.sub_scalar(0.25).div_scalar(0.5).clamp(0.0, 1.0)
}

/// Combine an optional user mask with an optional automatic mask
///
/// Takes the elementwise minimum when both exist.
pub fn effective_mask<B: Backend>(
    user: Option<Tensor<B, 4>>,
    auto: Option<Tensor<B, 4>>,
) -> Result<Option<Tensor<B, 4>>, CodecError> {
    match (user, auto) {
        (Some(user), Some(auto)) => {
            let dims = max_dims(user.dims(), auto.dims());
            let user = broadcast_to(user, dims, "mask")?;
            let auto = broadcast_to(auto, dims, "automatic mask")?;
            Ok(Some(user.min_pair(auto)))
        }
        (Some(mask), None) | (None, Some(mask)) => Ok(Some(mask)),
        (None, None) => Ok(None),
    }
}

/// Check that a mask covers an image's spatial extent
pub fn check_mask_shape(image: [usize; 4], mask: [usize; 4]) -> Result<(), CodecError> {
    let [ib, ih, iw, ic] = image;
    let [mb, mh, mw, mc] = mask;
    if (mh, mw) != (ih, iw) {
        return Err(CodecError::Shape(format!(
            "mask is {}x{} but image is {}x{}",
            mh, mw, ih, iw
        )));
    }
    if mc != 1 && mc != ic {
        return Err(CodecError::Shape(format!(
            "mask has {} channels, expected 1 or {}",
            mc, ic
        )));
    }
    if mb != 1 && mb != ib {
        return Err(CodecError::Shape(format!(
            "mask batch {} does not match image batch {}",
            mb, ib
        )));
    }
    Ok(())
}

/// Scale an 8-bit `[0, 255]` mask to `[0, 1]` weights
pub fn mask_from_pixels<B: Backend>(mask: Tensor<B, 4>) -> Tensor<B, 4> {
    mask.div_scalar(255.0)
}

/// Check that every mask weight lies in `[0, 1]`
///
/// Reads the mask back to the host once.
pub fn check_mask_range<B: Backend>(mask: &Tensor<B, 4>) -> Result<(), CodecError> {
    let values: Vec<f32> = mask
        .clone()
        .into_data()
        .convert::<f32>()
        .to_vec()
        .map_err(|e| CodecError::Data(format!("{:?}", e)))?;

    match values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        Some(v) => Err(CodecError::Range(format!(
            "mask weight {} is outside [0, 1]; scale 8-bit masks with mask_from_pixels",
            v
        ))),
        None => Ok(()),
    }
}

fn max_dims(a: [usize; 4], b: [usize; 4]) -> [usize; 4] {
    std::array::from_fn(|i| a[i].max(b[i]))
}

/// Repeat unit batch/channel dimensions up to `dims`
fn broadcast_to<B: Backend>(
    tensor: Tensor<B, 4>,
    dims: [usize; 4],
    name: &str,
) -> Result<Tensor<B, 4>, CodecError> {
    let mut tensor = tensor;
    for dim in [0, 3] {
        let have = tensor.dims()[dim];
        if have == dims[dim] {
            continue;
        }
        if have != 1 {
            return Err(CodecError::Shape(format!(
                "{} has shape {:?}, cannot broadcast to {:?}",
                name,
                tensor.dims(),
                dims
            )));
        }
        tensor = tensor.repeat_dim(dim, dims[dim]);
    }

    let shape = tensor.dims();
    if shape != dims {
        return Err(CodecError::Shape(format!(
            "{} has shape {:?}, expected {:?}",
            name, shape, dims
        )));
    }
    Ok(tensor)
}
