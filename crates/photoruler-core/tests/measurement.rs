//! End-to-end checks of the measurement chain and polygon utilities.

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use approx::assert_relative_eq;
use photoruler_core::{
    center_polygon, circumscribed_rectangle, min_max_coords, polygon_shape, CameraParams,
    CenterOptions, Known, Measurement, Polygon, Ruler,
};

fn canon_ruler() -> Result<Ruler> {
    let camera = CameraParams::new(0.00818, 50.0)
        .with_sensor_shape(5472, 3648)
        .build()?;
    Ok(Ruler::new(camera))
}

#[test]
fn shared_ruler_across_threads() -> Result<()> {
    let ruler = Arc::new(canon_ruler()?);
    let expected = ruler.distance_to_object(3179.0, 150.0, None, 0.0)?;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ruler = Arc::clone(&ruler);
            thread::spawn(move || {
                let angle = Some(i as f64 * 10.0);
                let d = ruler.distance_to_object(3179.0, 150.0, angle, 0.0)?;
                let l = ruler.object_length_in_cm(d, 3179.0, angle, 0.0)?;
                let plain = ruler.distance_to_object(3179.0, 150.0, None, 0.0)?;
                Ok::<_, photoruler_core::RulerError>((l, plain))
            })
        })
        .collect();

    for handle in handles {
        let (length, plain) = handle.join().expect("worker panicked")?;
        assert_relative_eq!(length, 150.0, max_relative = 1e-9);
        assert_eq!(plain, expected);
    }
    Ok(())
}

#[test]
fn steeper_angle_means_closer_object() -> Result<()> {
    let ruler = canon_ruler()?;
    let flat = ruler.distance_to_object(1000.0, 50.0, Some(0.0), 0.0)?;
    let steep = ruler.distance_to_object(1000.0, 50.0, Some(60.0), 0.0)?;
    // the same pixel span at 60 deg corresponds to twice the sensor length
    assert_relative_eq!(steep, flat / 2.0, max_relative = 1e-9);
    Ok(())
}

#[test]
fn measurement_request_from_json() -> Result<()> {
    let ruler = canon_ruler()?;
    let request: Measurement = serde_json::from_str(
        r#"{"length_px": 1200, "known": {"type": "distance", "cm": 250}, "angle_degrees": 30}"#,
    )?;
    assert_eq!(request.known, Known::Distance(250.0));
    let result = ruler.measure(&request)?;
    let direct = ruler.object_length_in_cm(250.0, 1200.0, Some(30.0), 0.0)?;
    assert_relative_eq!(result.real_length_cm, direct);
    Ok(())
}

#[test]
fn centering_without_resize_keeps_extents() -> Result<()> {
    let polygons = [
        Polygon::from_rows(&[[0.5, 1.5], [9.0, 2.0], [8.5, 7.25], [1.0, 6.0]])?,
        Polygon::from_rows(&[[-40.0, 10.0], [600.0, 10.0], [600.0, 900.0]])?,
        Polygon::from_rows(&[[1.0, 2.0, 3.0], [4.0, 8.0, 16.0]])?,
    ];
    let opts = CenterOptions {
        resize_on_bigger: false,
        resize_on_lower: false,
        pad: 0.0,
    };
    for polygon in &polygons {
        let shape = vec![64.0; polygon.dim()];
        let centered = center_polygon(polygon, &shape, &opts)?;
        let before = polygon_shape(polygon, false);
        let after = polygon_shape(&centered, false);
        for (b, a) in before.iter().zip(&after) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
        let center = min_max_coords(&centered).center();
        for c in center.iter() {
            assert_relative_eq!(*c, 32.0, epsilon = 1e-9);
        }
    }
    Ok(())
}

#[test]
fn circumscribed_rectangle_always_has_four_corners() -> Result<()> {
    let triangle = Polygon::from_rows(&[[3.0, 1.0], [7.0, 9.0], [0.0, 4.0]])?;
    let rect = circumscribed_rectangle(&triangle, None)?;
    assert_eq!(rect.len(), 4);
    let shape = polygon_shape(&rect, false);
    assert!(shape[0] * shape[1] > 0.0);
    Ok(())
}
