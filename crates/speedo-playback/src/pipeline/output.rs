//! Device sink stage: a cpal output stream pulling from [`PipelineShared`].

use super::PipelineShared;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

/// Running output stream. Dropping it closes the device.
pub(crate) struct OutputStream {
    _stream: cpal::Stream,
    pub(crate) sample_rate: u32,
    pub(crate) channels: usize,
}

impl OutputStream {
    pub(crate) fn open(device_index: Option<usize>, shared: Arc<PipelineShared>) -> Result<Self> {
        let device = get_device(device_index)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), shared)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), shared)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), shared)?,
            format => {
                return Err(Error::InvalidDevice(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };
        stream.play()?;

        tracing::info!("pipeline: output at {sample_rate} Hz, {channels} ch");

        Ok(Self {
            _stream: stream,
            sample_rate,
            channels,
        })
    }
}

pub(crate) fn list_devices() -> Result<Vec<String>> {
    cpal::default_host()
        .output_devices()?
        .enumerate()
        .map(|(i, d)| {
            let name = d.name().unwrap_or_else(|_| "<unnamed>".into());
            Ok(format!("{i}: {name}"))
        })
        .collect()
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    shared: Arc<PipelineShared>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;

    // Grows on the first callback, then stable
    let mut scratch = Vec::<f32>::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                if scratch.len() < data.len() {
                    scratch.resize(data.len(), 0.0);
                }
                let buffer = &mut scratch[..data.len()];
                shared.render(buffer, channels, sample_rate);
                write_output(data, buffer);
            }));

            if result.is_err() {
                output_silence(data);
            }
        },
        |err| tracing::warn!("pipeline: stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

/// Sample conversion stage: f32 into the device format.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T], buffer: &[f32]) {
    for (sample, &value) in data.iter_mut().zip(buffer) {
        *sample = T::from_sample(value.clamp(-1.0, 1.0));
    }
}

#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    for sample in data.iter_mut() {
        *sample = T::from_sample(0.0);
    }
}
