mod common;

use common::{RecordingDomain, build_image, sample_header};
use crate_image::{
    Address, CheckedCrateImage, CrateHeader, CrateImage, Error, Glue, HEADER_SIZE, MemoryExtent,
    input::CrateBinary,
};
use rstest::{fixture, rstest};

const IMAGE_LEN: usize = 0x400;

#[fixture]
fn checked() -> CheckedCrateImage {
    let image = CrateImage::new(sample_header(), Address::new(0x1000));
    CheckedCrateImage::new(image, MemoryExtent::new(Address::new(0x1000), IMAGE_LEN)).unwrap()
}

fn bounded(header: CrateHeader) -> CheckedCrateImage {
    let image = CrateImage::new(header, Address::new(0x1000));
    CheckedCrateImage::new(image, MemoryExtent::new(Address::new(0x1000), IMAGE_LEN)).unwrap()
}

#[rstest]
fn accepts_well_formed_header(checked: CheckedCrateImage) {
    let domain = RecordingDomain::default();
    let table = checked.glue_table().unwrap();
    assert_eq!(table, checked.unchecked().glue_table());
    assert_eq!(
        checked.debug_info(&domain).unwrap(),
        checked.unchecked().debug_info(&domain)
    );
    assert!(checked.debug_abbrev(&domain).is_ok());
    assert_eq!(domain.len(), 3);
}

#[rstest]
fn forwards_infallible_accessors(checked: CheckedCrateImage) {
    let image = checked.unchecked();
    assert_eq!(checked.image_base().unwrap(), image.image_base());
    assert_eq!(checked.relocation_diff(), image.relocation_diff());
    assert_eq!(checked.self_addr(), image.self_addr());
    assert_eq!(checked.addr(), image.addr());
    assert_eq!(checked.header(), image.header());
    assert_eq!(checked.bias(), image.bias());
}

#[rstest]
#[case(0)]
#[case(0x100)]
#[case(IMAGE_LEN as isize - 1)]
fn accepts_image_base_inside_image(#[case] off: isize) {
    let checked = bounded(CrateHeader {
        image_base_off: off,
        ..sample_header()
    });
    assert_eq!(checked.image_base().unwrap(), Address::new(0x1000).offset(off));
}

#[rstest]
#[case(0x10_0000)]
#[case(IMAGE_LEN as isize)]
#[case(-1)]
fn rejects_image_base_outside_image(#[case] off: isize) {
    let checked = bounded(CrateHeader {
        image_base_off: off,
        ..sample_header()
    });
    let err = checked.image_base().unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
    assert!(err.to_string().contains("image base"));
    // the unchecked resolver still hands the address out
    assert_eq!(checked.unchecked().image_base(), Address::new(0x1000).offset(off));
}

#[rstest]
#[case(0x9000)]
#[case(0x1000 + IMAGE_LEN - 8)]
#[case(0x0)]
fn rejects_header_outside_extent(#[case] addr: usize) {
    let image = CrateImage::new(sample_header(), Address::new(addr));
    let err = CheckedCrateImage::new(image, MemoryExtent::new(Address::new(0x1000), IMAGE_LEN))
        .unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
    assert!(err.to_string().contains("crate header"));
}

#[rstest]
fn header_ending_at_image_end_is_accepted() {
    let addr = Address::new(0x1000 + IMAGE_LEN - HEADER_SIZE);
    let image = CrateImage::new(CrateHeader::default(), addr);
    let checked =
        CheckedCrateImage::new(image, MemoryExtent::new(Address::new(0x1000), IMAGE_LEN)).unwrap();
    assert_eq!(checked.addr(), addr);
}

#[rstest]
fn header_larger_than_extent_is_rejected() {
    let bytes = sample_header().to_bytes();
    let image = CrateImage::new(sample_header(), Address::from_ptr(bytes.as_ptr()));
    let extent = MemoryExtent::of_slice(&bytes[..HEADER_SIZE - 1]);
    assert!(CheckedCrateImage::new(image, extent).is_err());
}

#[rstest]
#[case(Glue::Activate)]
#[case(Glue::MainExitTask)]
#[case(Glue::Unwind)]
#[case(Glue::Yield)]
fn rejects_glue_outside_image(#[case] glue: Glue) {
    let mut header = sample_header();
    match glue {
        Glue::Activate => header.activate_glue_off = IMAGE_LEN as isize,
        Glue::MainExitTask => header.main_exit_task_glue_off = -1,
        Glue::Unwind => header.unwind_glue_off = 0x10_0000,
        Glue::Yield => header.yield_glue_off = isize::MIN,
    }
    let checked = bounded(header);
    let image = *checked.unchecked();
    assert!(matches!(checked.glue(glue), Err(Error::OutOfBounds { .. })));
    assert!(checked.glue_table().is_err());
    for other in Glue::ALL.into_iter().filter(|other| *other != glue) {
        assert!(checked.glue(other).is_ok());
    }
    // the unchecked resolver still hands the address out
    assert_eq!(checked.unchecked().glue(glue), image.glue(glue));
}

#[rstest]
#[case(0x3f0, 0x20)]
#[case(-0x10, 0x20)]
#[case(0x100, usize::MAX)]
fn rejects_debug_span_outside_image(#[case] off: isize, #[case] size: usize) {
    let header = CrateHeader {
        debug_info_off: off,
        debug_info_sz: size,
        ..sample_header()
    };
    let checked = bounded(header);
    let domain = RecordingDomain::default();
    let err = checked.debug_info(&domain).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
    assert!(err.to_string().contains(".debug_info"));
    assert_eq!(domain.len(), 0);
}

#[rstest]
fn span_ending_at_image_end_is_accepted() {
    let header = CrateHeader {
        debug_abbrev_off: (IMAGE_LEN - 0x10) as isize,
        debug_abbrev_sz: 0x10,
        ..sample_header()
    };
    let checked = bounded(header);
    let region = checked.debug_abbrev(&RecordingDomain::default()).unwrap();
    assert_eq!(region.limit(), checked.extent().end());
}

#[rstest]
fn checked_binary_reads_debug_bytes() {
    let bytes = build_image(&sample_header(), IMAGE_LEN);
    let binary = CrateBinary::new("libcore.so", &bytes);
    let checked = binary.checked().unwrap();
    let region = checked.debug_abbrev(&RecordingDomain::default()).unwrap();
    let expected: Vec<u8> = (0x280..0x290).map(|off: usize| off as u8).collect();
    assert_eq!(unsafe { region.as_bytes() }, expected.as_slice());
}

#[rstest]
fn truncated_binary_fails_checks() {
    let bytes = build_image(&sample_header(), 0x100);
    let checked = CrateBinary::new("truncated", &bytes).checked().unwrap();
    assert!(checked.activate_glue().is_ok());
    assert!(checked.debug_info(&RecordingDomain::default()).is_err());
}
