// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parsers for comma separated command line values

use crate::geometry::TextureRegion;
use nalgebra::Vector3;

fn parse_floats<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma separated numbers, got {:?}", value));
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid number {:?} in {:?}", part, value))?;
    }
    Ok(out)
}

/// `x,y,z`
pub fn parse_vector3(value: &str) -> Result<Vector3<f64>, String> {
    let [x, y, z] = parse_floats::<3>(value)?;
    Ok(Vector3::new(x, y, z))
}

/// `start_u,start_v,end_u,end_v`
pub fn parse_region(value: &str) -> Result<TextureRegion, String> {
    let [su, sv, eu, ev] = parse_floats::<4>(value)?;
    Ok(TextureRegion::new(su, sv, eu, ev))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector3() {
        assert_eq!(parse_vector3("0, 1,0").unwrap(), Vector3::new(0.0, 1.0, 0.0));
        assert!(parse_vector3("0,1").is_err());
        assert!(parse_vector3("0,x,1").is_err());
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(
            parse_region("0,0.5,0.5,1").unwrap(),
            TextureRegion::new(0.0, 0.5, 0.5, 1.0)
        );
        assert!(parse_region("0,0,1").is_err());
    }
}
