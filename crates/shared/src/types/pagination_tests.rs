use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest {
        page: 1,
        per_page: 20,
    };
    assert_eq!(request.offset(), 0);

    let request = PageRequest {
        page: 3,
        per_page: 50,
    };
    assert_eq!(request.offset(), 100);
    assert_eq!(request.limit(), 50);
}

#[test]
fn test_page_request_zero_page_offset() {
    let request = PageRequest {
        page: 0,
        per_page: 20,
    };
    assert_eq!(request.offset(), 0);
}

#[test]
fn test_page_request_normalized() {
    let request = PageRequest {
        page: 0,
        per_page: 10_000,
    }
    .normalized();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, MAX_PER_PAGE);

    let request = PageRequest {
        page: 2,
        per_page: 0,
    }
    .normalized();
    assert_eq!(request.per_page, 1);
}

#[test]
fn test_page_response_total_pages() {
    let response = PageResponse::new(vec![1, 2, 3], 1, 20, 41);
    assert_eq!(response.meta.total_pages, 3);

    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 20, 0);
    assert_eq!(response.meta.total_pages, 1);

    let response = PageResponse::new(vec![1], 2, 20, 40);
    assert_eq!(response.meta.total_pages, 2);
}

#[test]
fn test_page_response_map() {
    let response = PageResponse::new(vec![1, 2], 1, 2, 5).map(|n| n * 10);
    assert_eq!(response.data, vec![10, 20]);
    assert_eq!(response.meta.total, 5);
    assert_eq!(response.meta.total_pages, 3);
}
