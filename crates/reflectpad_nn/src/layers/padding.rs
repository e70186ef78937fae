use crate::layer::{Layer, LayerState};
use reflectpad_core::{error::Result, pad::PadSpec};
use reflectpad_tensor::Tensor;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reflection padding over the three trailing axes of a [C,T,H,W] or
/// [N,C,T,H,W] input.
///
/// The layer has no parameters and behaves the same in training and
/// evaluation mode.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReflectionPad3d {
    pad: PadSpec,

    state: LayerState,
}

impl ReflectionPad3d {
    /// `pad` is (left, right, top, bottom, front, back).
    pub fn new(pad: &[usize]) -> Result<Self> {
        Ok(Self {
            pad: PadSpec::try_from(pad)?,
            state: LayerState::new(),
        })
    }

    pub fn uniform(pad: usize) -> Self {
        Self {
            pad: PadSpec::uniform(pad),
            state: LayerState::new(),
        }
    }

    pub fn pad(&self) -> &PadSpec {
        &self.pad
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        input.reflection_pad3d(&self.pad)
    }

    pub fn parameters(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}

impl<'a> Layer<&'a Tensor> for ReflectionPad3d {
    fn forward(&self, input: &'a Tensor) -> Result<Tensor> {
        self.forward(input)
    }

    fn parameters(&mut self) -> Vec<&mut Tensor> {
        self.parameters()
    }

    fn is_training(&self) -> bool {
        self.state.is_training()
    }

    fn train(&mut self) {
        self.state.train();
    }

    fn eval(&mut self) {
        self.state.eval();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflectpad_core::{
        device::{set_default_device, Device},
        error::Error,
    };

    fn setup_device() {
        set_default_device(Device::Pool(0));
    }

    fn setup_input(data: Vec<f32>, shape: &[usize]) -> Result<Tensor> {
        setup_device();
        let mut input = Tensor::new(data)?;
        input.with_shape(shape)?;
        Ok(input)
    }

    #[test]
    fn new_rejects_wrong_pad_count() {
        assert!(matches!(ReflectionPad3d::new(&[1, 1, 1]), Err(Error::InvalidArgument(_))));
        assert!(ReflectionPad3d::new(&[1, 2, 3, 4, 5, 6]).is_ok());
    }

    #[test]
    fn pad_accessor() -> Result<()> {
        let layer = ReflectionPad3d::new(&[1, 2, 3, 4, 5, 6])?;
        assert_eq!(layer.pad().as_array(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(ReflectionPad3d::uniform(2).pad().as_array(), [2; 6]);
        Ok(())
    }

    #[test]
    fn forward() -> Result<()> {
        let layer = ReflectionPad3d::new(&[1, 1, 0, 0, 0, 0])?;
        let input = setup_input(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[1, 1, 2, 3])?;

        let output = layer.forward(&input)?;

        assert_eq!(output.shape(), &[1, 1, 2, 5]);
        assert_eq!(
            output.to_flatten_vec::<f32>()?,
            vec![2.0, 1.0, 2.0, 3.0, 2.0, 5.0, 4.0, 5.0, 6.0, 5.0]
        );
        Ok(())
    }

    #[test]
    fn forward_ignores_mode() -> Result<()> {
        let mut layer = ReflectionPad3d::uniform(1);
        let input = setup_input((0..48).map(|v| v as f32).collect(), &[1, 2, 3, 2, 4])?;

        layer.train();
        assert!(Layer::is_training(&layer));
        let trained = layer.forward(&input)?.to_flatten_vec::<f32>()?;

        layer.eval();
        assert!(!Layer::is_training(&layer));
        let evaluated = layer.forward(&input)?.to_flatten_vec::<f32>()?;

        assert_eq!(trained, evaluated);
        Ok(())
    }

    #[test]
    fn backward() -> Result<()> {
        let layer = ReflectionPad3d::new(&[2, 0, 0, 0, 0, 0])?;
        let mut input = setup_input(vec![1.0, 2.0, 3.0], &[1, 1, 1, 3])?;
        input.with_grad()?;

        let output = layer.forward(&input)?;
        output.backward()?;

        let input_grad = input.grad()?.expect("Input gradient should exist");
        assert_eq!(input_grad.shape(), &[1, 1, 1, 3]);
        assert_eq!(input_grad.to_flatten_vec::<f32>()?, vec![1.0, 2.0, 2.0]);
        Ok(())
    }

    #[test]
    fn no_parameters() {
        let mut layer = ReflectionPad3d::uniform(1);
        assert!(Layer::parameters(&mut layer).is_empty());
    }
}
