use nac::{Error, Result, check_positive};
use nd::{Array, ArrayView, Ix1};

/// Grid spacing on a tangent plane: `dy` is uniform, `dx[j]` is the zonal
/// spacing shared by every cell of y-row `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonalSpacing {
  dx: Array<f64, Ix1>,
  dy: f64,
}

impl ZonalSpacing {
  pub fn new(dx: Array<f64, Ix1>, dy: f64) -> Result<ZonalSpacing> {
    if dx.is_empty() {
      return Err(Error::invalid("dx", "need at least one row"));
    }
    for &v in dx.iter() {
      check_positive("dx", v)?;
    }
    check_positive("dy", dy)?;

    Ok(ZonalSpacing { dx, dy, })
  }

  pub fn uniform(ny: usize, dx: f64, dy: f64) -> Result<ZonalSpacing> {
    ZonalSpacing::new(Array::from_elem(ny, dx), dy)
  }

  /// `dx_j = radius * cos(lat_j) * dlon` for row latitudes in degrees.
  /// Rows at the poles have no zonal extent and are rejected.
  pub fn from_latitudes(latitudes: &[f64], dlon: f64, dy: f64,
                        radius: f64) -> Result<ZonalSpacing> {
    check_positive("dlon", dlon)?;
    check_positive("radius", radius)?;
    if let Some(lat) = latitudes.iter().find(|lat| !(lat.abs() < 90.0) ) {
      return Err(Error::invalid("latitudes", format!("row latitude {} is not strictly between the poles", lat)));
    }

    let dlon = dlon.to_radians();
    let dx = latitudes
      .iter()
      .map(|lat| radius * lat.to_radians().cos() * dlon )
      .collect::<Vec<_>>();

    ZonalSpacing::new(Array::from(dx), dy)
  }

  pub fn dx(&self) -> ArrayView<'_, f64, Ix1> { self.dx.view() }
  pub fn dy(&self) -> f64 { self.dy }
  pub fn ny(&self) -> usize { self.dx.len() }
}
